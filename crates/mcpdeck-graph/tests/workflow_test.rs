use std::collections::BTreeSet;

use mcpdeck_graph::{
    build_workflow, AuthLinkChange, Connection, ConnectError, EdgeType, LayoutConfig, NodeType,
    WorkflowGraph, WorkflowGraphBuilder, WorkflowSession,
};
use mcpdeck_types::{AuthKind, McpServer, OAuthProvider, Tool};
use serde_json::json;

fn server() -> McpServer {
    McpServer {
        id: "srv".to_string(),
        name: "CRM".to_string(),
        description: Some("Customer records".to_string()),
    }
}

fn tools() -> Vec<Tool> {
    vec![
        Tool::new("a", "list_contacts").with_endpoint("GET", "https://crm/contacts"),
        Tool::new("b", "create_contact")
            .with_endpoint("POST", "https://crm/contacts")
            .with_oauth_provider("google"),
        Tool::new("c", "sync")
            .with_endpoint("POST", "https://crm/sync")
            .with_api_key_provider("key")
            .with_enabled(false),
        Tool::new("d", "export")
            .with_endpoint("GET", "https://crm/export")
            .with_oauth_provider("google"),
    ]
}

fn ids(graph: &WorkflowGraph) -> (BTreeSet<String>, BTreeSet<String>) {
    (
        graph.node_ids().into_iter().map(String::from).collect(),
        graph.edge_ids().into_iter().map(String::from).collect(),
    )
}

#[test]
fn test_build_is_idempotent() {
    let providers = vec![OAuthProvider::new("google", "Google", "abc")];

    let first = build_workflow(&server(), &tools(), &providers);
    let second = build_workflow(&server(), &tools(), &providers);

    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first, second);
}

#[test]
fn test_node_ids_are_unique() {
    let graph = build_workflow(&server(), &tools(), &[]);
    let unique: BTreeSet<&str> = graph.node_ids().into_iter().collect();
    assert_eq!(unique.len(), graph.nodes.len());
}

#[test]
fn test_auth_topology() {
    let graph = build_workflow(&server(), &tools(), &[]);

    for tool in tools() {
        let tool_node = NodeType::Tool.node_id(&tool.id);
        let outgoing: Vec<_> = graph.edges.iter().filter(|e| e.source == tool_node).collect();
        assert_eq!(outgoing.len(), 1, "tool {} should have one outgoing edge", tool.id);

        match tool.auth_provider() {
            Some((kind, provider_id)) => {
                let auth_nodes: Vec<_> = graph
                    .nodes_of_type(NodeType::AuthProvider)
                    .filter(|n| n.as_auth_provider().and_then(|a| a.tool_id.as_deref()) == Some(tool.id.as_str()))
                    .collect();
                assert_eq!(auth_nodes.len(), 1);

                let auth_id = &auth_nodes[0].id;
                assert_eq!(auth_id, &format!("auth-provider-{}-{}", tool.id, provider_id));

                let to_auth = outgoing[0];
                assert_eq!(&to_auth.target, auth_id);
                assert_eq!(to_auth.edge_type, Some(EdgeType::Deletable));
                assert_eq!(to_auth.label.as_deref(), Some(kind.label()));
                assert!(to_auth.style.stroke_dasharray.is_some());

                let to_api: Vec<_> = graph.edges.iter().filter(|e| &e.source == auth_id).collect();
                assert_eq!(to_api.len(), 1);
                assert_eq!(to_api[0].target, NodeType::ApiEndpoint.node_id(&tool.id));
                assert_eq!(to_api[0].edge_type, None);
                assert!(to_api[0].style.stroke_dasharray.is_none());
            }
            None => {
                assert_eq!(outgoing[0].edge_type, Some(EdgeType::ToolToApi));
                assert_eq!(outgoing[0].target, NodeType::ApiEndpoint.node_id(&tool.id));
            }
        }
    }

    // shared provider still gets one node per tool
    assert!(graph.node("auth-provider-b-google").is_some());
    assert!(graph.node("auth-provider-d-google").is_some());
}

#[test]
fn test_tool_rows_are_centered() {
    let layout = LayoutConfig::default().with_center_y(500.0);
    let tools = tools();
    let graph = WorkflowGraphBuilder::new(&server())
        .tools(&tools)
        .layout(layout)
        .build();

    let offsets: f64 = graph
        .nodes_of_type(NodeType::Tool)
        .map(|n| n.position.y - layout.center_y)
        .sum();
    assert!(offsets.abs() < 1e-9);

    assert_eq!(graph.node("llm-srv").unwrap().position.y, 500.0);
    assert_eq!(graph.node("server-srv").unwrap().position.y, 500.0);

    // auth and endpoint nodes share their tool's row
    let tool_b = graph.node("tool-b").unwrap().position;
    assert_eq!(graph.node("auth-provider-b-google").unwrap().position.y, tool_b.y);
    assert_eq!(graph.node("api-endpoint-b").unwrap().position.y, tool_b.y);
    assert!(graph.node("api-endpoint-b").unwrap().position.x > graph.node("api-endpoint-a").unwrap().position.x);
}

#[test]
fn test_has_client_id() {
    let tools = vec![
        Tool::new("t1", "a").with_oauth_provider("blank"),
        Tool::new("t2", "b").with_oauth_provider("set"),
        Tool::new("t3", "c").with_oauth_provider("gone"),
    ];
    let providers = vec![
        OAuthProvider::new("blank", "Blank", "  "),
        OAuthProvider::new("set", "Set", "abc"),
    ];
    let graph = build_workflow(&server(), &tools, &providers);

    let has = |id: &str| graph.node(id).unwrap().as_auth_provider().unwrap().has_client_id;
    assert!(!has("auth-provider-t1-blank"));
    assert!(has("auth-provider-t2-set"));
    assert!(!has("auth-provider-t3-gone"));
}

#[test]
fn test_server_edge_reflects_enabled() {
    let graph = build_workflow(&server(), &tools(), &[]);

    assert!(graph.edge("e-server-srv-tool-a").unwrap().animated);
    assert!(!graph.edge("e-server-srv-tool-c").unwrap().animated);
}

#[test]
fn test_connect_then_rebuild() {
    let mut tools = tools();
    let mut graph = build_workflow(&server(), &tools, &[]);
    graph
        .add_auth_provider_node(AuthKind::OAuth, "github", "GitHub", true, Default::default())
        .unwrap();

    let change = graph
        .plan_connect(&Connection::new("tool-a", "auth-provider-github"))
        .unwrap();
    assert!(change.apply_to(&mut tools));

    let rebuilt = build_workflow(&server(), &tools, &[]);
    let diff = graph.diff(&rebuilt);
    assert!(diff.added_nodes.contains(&"auth-provider-a-github".to_string()));
    assert!(diff.removed_nodes.contains(&"auth-provider-github".to_string()));
    assert!(diff.removed_edges.contains(&"e-tool-a-api-endpoint-a".to_string()));

    assert_eq!(
        rebuilt.plan_connect(&Connection::new("tool-a", "auth-provider-b-google")),
        Err(ConnectError::SlotOccupied {
            tool_id: "a".to_string(),
            kind: AuthKind::OAuth,
        })
    );
}

#[test]
fn test_delete_then_rebuild() {
    let mut tools = tools();
    let graph = build_workflow(&server(), &tools, &[]);

    let plan = graph.plan_delete(&["auth-provider-b-google"]);
    assert!(plan.remove.is_empty());
    assert_eq!(
        plan.unlinks(),
        vec![
            AuthLinkChange::unlink("b", AuthKind::OAuth),
            AuthLinkChange::unlink("d", AuthKind::OAuth),
        ]
    );

    for change in plan.unlinks() {
        change.apply_to(&mut tools);
    }
    let rebuilt = build_workflow(&server(), &tools, &[]);

    assert!(rebuilt.node("auth-provider-b-google").is_none());
    assert!(rebuilt.node("auth-provider-d-google").is_none());
    assert_eq!(
        rebuilt.edge("e-tool-b-api-endpoint-b").unwrap().edge_type,
        Some(EdgeType::ToolToApi)
    );
}

#[test]
fn test_session_with_patch() {
    let mut session = WorkflowSession::new(build_workflow(&server(), &tools(), &[]));
    session.select(Some("tool-a"));

    session
        .graph_mut()
        .update_node_data("tool-a", &json!({"enabled": false}))
        .unwrap();
    assert!(!session.graph().edge("e-server-srv-tool-a").unwrap().animated);

    let ticket = session.begin_refresh();
    let diff = session
        .complete_refresh(ticket, build_workflow(&server(), &tools(), &[]))
        .unwrap();
    assert!(diff.is_empty());
    assert_eq!(session.selected(), Some("tool-a"));
}

#[test]
fn test_graph_json_shape() {
    let graph = build_workflow(&server(), &tools()[..1], &[]);
    let value = serde_json::to_value(&graph).unwrap();

    assert_eq!(value["nodes"][0]["type"], "llm");
    assert_eq!(value["nodes"][2]["data"]["toolId"], "a");
    assert_eq!(value["edges"][0]["sourceHandle"], "source");
    assert_eq!(value["edges"][0]["targetHandle"], "target");
    assert_eq!(value["edges"][2]["data"]["onAddAuth"], "add-auth:a");
}
