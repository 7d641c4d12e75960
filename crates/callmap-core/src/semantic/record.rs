//! Reachability report values.

/// Department shown for users whose department is blank.
pub const NO_DEPARTMENT: &str = "No Department";

/// A user reached by a routing path, with the number-block labels of their
/// numbers.
///
/// Records order by number first, so sets of records list users in
/// extension order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserRecord {
    pub number: String,
    pub name: String,
    pub department: String,
    pub dids: Vec<String>,
    pub outbound_caller_id: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    /// Block label per DID, in DID order; unmatched DIDs are skipped.
    pub did_blocks: Vec<String>,
    pub caller_id_block: Option<String>,
}

impl UserRecord {
    /// DIDs joined the way exports write them.
    pub fn dids_joined(&self) -> String {
        self.dids.join(":")
    }
}
