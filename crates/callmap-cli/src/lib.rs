//! CLI logic for the callmap tool.
//!
//! Loads configuration and a PBX bundle, then writes call-flow diagrams as
//! DOT files or prints reachability reports as tab-separated rows.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::{info, warn};

use callmap::{
    Bundle, CallMap, CallMapError,
    reach::{AttendantAttribution, ReachRow},
    semantic::UserRecord,
};

use error_adapter::{diagnostic_reportables, render};

/// Run the callmap CLI application, printing reports to standard output.
///
/// # Errors
///
/// Returns `CallMapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Bundle parsing errors
/// - Group selectors matching no flow group
pub fn run(args: &Args) -> Result<(), CallMapError> {
    let stdout = io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the CLI, printing reports to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_output(args: &Args, out: &mut impl Write) -> Result<(), CallMapError> {
    let bundle_path = args.command.bundle();
    info!(bundle_path = bundle_path; "Processing bundle");

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(bundle_path)?;

    let callmap = CallMap::new(app_config);
    let bundle = callmap.load(&source)?;
    for reportable in diagnostic_reportables(bundle.warnings(), &source) {
        warn!("{}", render(&reportable));
    }

    match &args.command {
        Command::Flows { output, group, .. } => {
            write_flows(&callmap, &bundle, Path::new(output), group.as_deref())
        }
        Command::Reach { group, .. } => {
            let rows = callmap.reachability(bundle.tables(), group.as_deref())?;
            write_reach_rows(out, &rows)?;
            info!(rows = rows.len(); "Reachability report written");
            Ok(())
        }
        Command::Attendants { .. } => {
            let rows = callmap.attendants_per_user(bundle.tables());
            write_attendant_rows(out, &rows)?;
            info!(rows = rows.len(); "Attendants-per-user report written");
            Ok(())
        }
    }
}

#[cfg(feature = "graphviz")]
fn write_flows(
    callmap: &CallMap,
    bundle: &Bundle,
    output_dir: &Path,
    group: Option<&str>,
) -> Result<(), CallMapError> {
    let diagrams = callmap.flow_diagrams(bundle.tables(), group)?;
    fs::create_dir_all(output_dir)?;

    for diagram in &diagrams {
        let path = output_dir.join(format!("{}.dot", diagram.id()));
        fs::write(&path, callmap.render_dot(diagram))?;
        info!(
            group = diagram.title(),
            output_file = path.display().to_string();
            "DOT exported successfully"
        );
    }
    Ok(())
}

#[cfg(not(feature = "graphviz"))]
fn write_flows(
    _callmap: &CallMap,
    _bundle: &Bundle,
    _output_dir: &Path,
    _group: Option<&str>,
) -> Result<(), CallMapError> {
    Err(CallMapError::Config(
        "callmap was built without the `graphviz` feature; flow diagrams cannot be exported"
            .to_string(),
    ))
}

fn write_reach_rows(out: &mut impl Write, rows: &[ReachRow]) -> io::Result<()> {
    writeln!(
        out,
        "Group\tNumber\tName\tDepartment\tDIDs\tDID blocks\tCaller ID\tCaller ID block\tMobile\tEmail"
    )?;
    for row in rows {
        writeln!(out, "{}\t{}", row.group, user_columns(&row.user))?;
    }
    Ok(())
}

fn write_attendant_rows(out: &mut impl Write, rows: &[AttendantAttribution]) -> io::Result<()> {
    writeln!(out, "Number\tName\tDepartment\tAttendant\tAttendant name\tVia\tRoutes")?;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.user.number,
            row.user.name,
            row.user.department,
            row.attendant_extension,
            row.attendant_name,
            row.via,
            row.routes.join(", ")
        )?;
    }
    Ok(())
}

fn user_columns(user: &UserRecord) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        user.number.clone(),
        user.name.clone(),
        user.department.clone(),
        user.dids_joined(),
        user.did_blocks.join(":"),
        optional(&user.outbound_caller_id),
        optional(&user.caller_id_block),
        optional(&user.mobile),
        optional(&user.email),
    ]
    .join("\t")
}
