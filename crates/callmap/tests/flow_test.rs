use callmap::{
    CallMap, CallMapError,
    config::{AnalysisConfig, AppConfig, StyleConfig},
    draw::EdgeStyle,
    model::{AttendantRole, AutoAttendant, Queue, RingGroup, Tables},
    semantic::{Diagram, VisualKind},
};

const OFFICE: &str = r#"
    [[auto_attendants]]
    extension = "100"
    name = "Main menu"
    role = "Primary"
    default = "End Call"
    menu = { 1 = "Wachtrij(200 Sales)" }

    [[queues]]
    extension = "200"
    name = "Sales"
    members = ["Alice"]
    no_answer = "End Call"

    [[users]]
    number = "101"
    name = "Alice"
"#;

fn edge_label<'d>(diagram: &'d Diagram, source: VisualKind, target: VisualKind) -> Vec<&'d str> {
    diagram
        .edges()
        .iter()
        .filter(|edge| {
            diagram.node(edge.source()).map(|node| node.kind()) == Some(source)
                && diagram.node(edge.target()).map(|node| node.kind()) == Some(target)
        })
        .filter_map(|edge| edge.label())
        .collect()
}

fn attendant_chain(length: usize) -> Tables {
    let auto_attendants = (0..length)
        .map(|index| AutoAttendant {
            extension: Some(format!("{}", 100 + index)),
            name: Some(format!("Level {index}")),
            department: Some("Chain".to_string()),
            role: if index == 0 {
                AttendantRole::Primary
            } else {
                AttendantRole::Secondary
            },
            default_route: Some(format!("IVR({})", 101 + index)),
            ..AutoAttendant::default()
        })
        .collect();

    Tables {
        auto_attendants,
        ..Tables::default()
    }
}

#[test]
fn test_office_scenario() {
    let callmap = CallMap::default();
    let bundle = callmap.load(OFFICE).expect("Failed to load bundle");
    let diagrams = callmap
        .flow_diagrams(bundle.tables(), None)
        .expect("Failed to build diagrams");

    assert_eq!(diagrams.len(), 1);
    let diagram = &diagrams[0];
    assert_eq!(diagram.title(), "IVR: Main menu (100)");

    let queue = diagram
        .nodes_of_kind(VisualKind::Queue)
        .next()
        .expect("queue node");
    assert!(queue.label().starts_with("Queue: Sales (200)"));
    assert!(queue.label().contains("Alice (Ext: 101)"));

    assert_eq!(
        edge_label(diagram, VisualKind::InHours, VisualKind::Queue),
        vec!["Choose 1"]
    );
    assert_eq!(
        edge_label(diagram, VisualKind::Queue, VisualKind::EndCall),
        vec!["No Answer"]
    );
    assert_eq!(
        edge_label(diagram, VisualKind::InHours, VisualKind::EndCall),
        vec!["Timeout /\nNo input"]
    );

    let hangups: Vec<_> = diagram
        .nodes_of_kind(VisualKind::EndCall)
        .filter(|node| node.label() == "Hang up")
        .collect();
    assert_eq!(hangups.len(), 1, "the shared hang-up node is reused");

    let reach = callmap
        .reachability(bundle.tables(), None)
        .expect("Failed to build report");
    assert_eq!(reach.len(), 1);
    assert_eq!(reach[0].group, "IVR: Main menu (100)");
    assert_eq!(reach[0].user.name, "Alice");

    let attribution = callmap.attendants_per_user(bundle.tables());
    assert_eq!(attribution.len(), 1);
    assert_eq!(attribution[0].attendant_extension, "100");
    assert_eq!(attribution[0].via.to_string(), "Queue: Sales (200)");
    assert_eq!(attribution[0].routes, vec!["Menu 1".to_string()]);
}

#[test]
fn test_department_fans_out_to_primary_attendants() {
    let tables = attendant_chain(3);
    let diagrams = CallMap::default()
        .flow_diagrams(&tables, Some("chain"))
        .expect("Failed to build diagrams");

    let diagram = &diagrams[0];
    assert_eq!(diagram.title(), "Department: Chain");

    let department = diagram
        .nodes_of_kind(VisualKind::Department)
        .next()
        .expect("department node");
    let fan_out: Vec<_> = diagram.edges_from(department.id()).collect();
    assert_eq!(fan_out.len(), 1);
    assert_eq!(fan_out[0].style(), EdgeStyle::Dotted);
    assert_eq!(
        diagram.node(fan_out[0].target()).map(|node| node.kind()),
        Some(VisualKind::AutoAttendant)
    );
}

#[test]
fn test_depth_bound_ends_in_max_depth_leaf() {
    let max_depth = 3;
    let config = AppConfig::new(AnalysisConfig::new(max_depth), StyleConfig::default());
    let tables = attendant_chain(10);

    let diagrams = CallMap::new(config)
        .flow_diagrams(&tables, None)
        .expect("Failed to build diagrams");
    let diagram = &diagrams[0];

    // Root plus one nested attendant per depth level up to the limit.
    assert_eq!(
        diagram.nodes_of_kind(VisualKind::AutoAttendant).count(),
        1 + max_depth
    );
    let leaves: Vec<_> = diagram.nodes_of_kind(VisualKind::MaxDepth).collect();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].label(), "Max depth reached");

    let deepest = diagram
        .nodes_of_kind(VisualKind::AutoAttendant)
        .last()
        .expect("deepest attendant");
    assert!(deepest.label().contains("(103)"));
    assert!(
        diagram
            .edges_from(deepest.id())
            .any(|edge| edge.target() == leaves[0].id() && edge.label() == Some("Direct"))
    );
}

#[test]
fn test_default_depth_bound() {
    let diagrams = CallMap::default()
        .flow_diagrams(&attendant_chain(15), None)
        .expect("Failed to build diagrams");

    assert_eq!(
        diagrams[0].nodes_of_kind(VisualKind::AutoAttendant).count(),
        11
    );
    assert_eq!(diagrams[0].nodes_of_kind(VisualKind::MaxDepth).count(), 1);
}

#[test]
fn test_cyclic_no_answer_chain_terminates_deterministically() {
    let tables = Tables {
        auto_attendants: vec![AutoAttendant {
            extension: Some("100".to_string()),
            default_route: Some("Queue(200)".to_string()),
            ..AutoAttendant::default()
        }],
        queues: vec![Queue {
            extension: Some("200".to_string()),
            no_answer: Some("Belgroep(300)".to_string()),
            ..Queue::default()
        }],
        ring_groups: vec![RingGroup {
            extension: Some("300".to_string()),
            no_answer: Some("Queue(200)".to_string()),
            ..RingGroup::default()
        }],
        ..Tables::default()
    };

    let callmap = CallMap::default();
    let first = callmap.flow_diagrams(&tables, None).unwrap();
    let second = callmap.flow_diagrams(&tables, None).unwrap();
    assert_eq!(first, second);

    let diagram = &first[0];
    assert_eq!(diagram.nodes_of_kind(VisualKind::Queue).count(), 1);
    assert_eq!(diagram.nodes_of_kind(VisualKind::RingGroup).count(), 1);
    assert!(
        diagram
            .edges()
            .iter()
            .any(|edge| edge.style() == EdgeStyle::Dashed
                && edge.label() == Some("No Answer (cycle)"))
    );
    assert_eq!(diagram.nodes_of_kind(VisualKind::MaxDepth).count(), 0);
}

#[test]
fn test_unknown_group_selection() {
    let callmap = CallMap::default();
    let bundle = callmap.load(OFFICE).unwrap();

    let err = callmap
        .flow_diagrams(bundle.tables(), Some("Marketing"))
        .unwrap_err();
    assert!(matches!(err, CallMapError::Selection(ref group) if group == "Marketing"));
}

#[test]
fn test_palette_overrides_fill() {
    let config: AppConfig = toml::from_str("[style.palette]\nqueue = \"#123456\"").unwrap();
    let callmap = CallMap::new(config);
    let bundle = callmap.load(OFFICE).unwrap();

    let diagrams = callmap.flow_diagrams(bundle.tables(), None).unwrap();
    let queue = diagrams[0].nodes_of_kind(VisualKind::Queue).next().unwrap();
    assert_eq!(queue.fill().to_hex(), "#123456");

    let invalid: AppConfig = toml::from_str("[style.palette]\nqueue = \"nope\"").unwrap();
    let err = CallMap::new(invalid)
        .flow_diagrams(bundle.tables(), None)
        .unwrap_err();
    assert!(matches!(err, CallMapError::Config(_)));
}

#[test]
fn test_malformed_bundle_keeps_source() {
    let source = "[[users]\nname = \"Alice\"";
    let err = CallMap::default().load(source).unwrap_err();

    match err {
        CallMapError::Parse { err, src } => {
            assert_eq!(src, source);
            assert!(!err.diagnostics().is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_distinct_text_routes_get_distinct_nodes() {
    let source = r#"
        [[auto_attendants]]
        extension = "100"
        name = "Main"
        default = "End Call"
        menu = { 1 = "Press 1!", 2 = "Press 1?" }
    "#;
    let callmap = CallMap::default();
    let bundle = callmap.load(source).unwrap();

    let diagrams = callmap.flow_diagrams(bundle.tables(), None).unwrap();
    let mut labels: Vec<_> = diagrams[0]
        .nodes_of_kind(VisualKind::Text)
        .map(|node| node.label())
        .collect();
    labels.sort();
    assert_eq!(labels, vec!["Text:\nPress 1!", "Text:\nPress 1?"]);
}

#[test]
fn test_similar_department_names_get_distinct_diagrams() {
    let source = r#"
        [[auto_attendants]]
        extension = "100"
        department = "Sales & Support"
        default = "End Call"

        [[auto_attendants]]
        extension = "200"
        department = "Sales - Support"
        default = "End Call"
    "#;
    let callmap = CallMap::default();
    let bundle = callmap.load(source).unwrap();

    let diagrams = callmap.flow_diagrams(bundle.tables(), None).unwrap();
    assert_eq!(diagrams.len(), 2);
    assert_ne!(diagrams[0].id(), diagrams[1].id());
}

#[test]
fn test_in_hours_node_uses_default_gray() {
    let callmap = CallMap::default();
    let bundle = callmap.load(OFFICE).unwrap();

    let diagrams = callmap.flow_diagrams(bundle.tables(), None).unwrap();
    let in_hours = diagrams[0].nodes_of_kind(VisualKind::InHours).next().unwrap();
    assert_eq!(in_hours.fill().to_hex(), "#d3d3d3");
}
