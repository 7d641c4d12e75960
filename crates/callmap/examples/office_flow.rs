//! Builds the call-flow diagrams of a small office and prints them as DOT.
//!
//! Run with `cargo run -p callmap --example office_flow --features graphviz`.

use callmap::{CallMap, config::AppConfig};

const OFFICE: &str = r#"
    [[auto_attendants]]
    extension = "100"
    name = "Reception"
    department = "Front office"
    role = "Primary"
    default = "Queue(200)"
    timeout = 10
    menu = { 1 = "Queue(200 Sales)", 2 = "Belgroep(300 Support)", 0 = "Gebruiker(101)" }

    [[queues]]
    extension = "200"
    name = "Sales"
    ring_time = 20
    members = ["Alice", "Bob"]
    no_answer = "Belgroep(300)"

    [[ring_groups]]
    extension = "300"
    name = "Support"
    members = ["Bob"]
    no_answer = "Queue(200)"

    [[users]]
    number = "101"
    name = "Alice"

    [[users]]
    number = "102"
    name = "Bob"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let callmap = CallMap::new(AppConfig::default());
    let bundle = callmap.load(OFFICE)?;

    for diagram in callmap.flow_diagrams(bundle.tables(), None)? {
        println!("// {}", diagram.title());
        println!("{}", callmap.render_dot(&diagram));
    }

    for row in callmap.reachability(bundle.tables(), None)? {
        println!("// {} reaches {} ({})", row.group, row.user.name, row.user.number);
    }
    Ok(())
}
