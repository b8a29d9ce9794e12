use anyhow::Result;
use mcpdeck_graph::{Connection, WorkflowGraphBuilder};
use mcpdeck_types::{ApiKeyProvider, AuthKind, McpServer, OAuthProvider, Tool};

// Builds the workflow graph for a small demo server and prints it as JSON.
//
//   cargo run -p mcpdeck-graph --example print_workflow
fn main() -> Result<()> {
    let server = McpServer {
        id: "demo".to_string(),
        name: "Demo Server".to_string(),
        description: Some("Example tools".to_string()),
    };

    let tools = vec![
        Tool::new("weather", "get_weather").with_endpoint("GET", "https://api.weather.dev/today"),
        Tool::new("calendar", "list_events")
            .with_endpoint("GET", "https://www.googleapis.com/calendar/v3/events")
            .with_oauth_provider("google"),
        Tool::new("billing", "create_charge")
            .with_endpoint("POST", "https://api.stripe.com/v1/charges")
            .with_api_key_provider("stripe")
            .with_enabled(false),
    ];
    let oauth = vec![OAuthProvider::new("google", "Google", "client-id")];
    let api_keys = vec![ApiKeyProvider::new("stripe", "Stripe")];

    let mut graph = WorkflowGraphBuilder::new(&server)
        .tools(&tools)
        .oauth_providers(&oauth)
        .api_key_providers(&api_keys)
        .build();

    println!("{}", serde_json::to_string_pretty(&graph)?);

    println!("\n=== Connecting weather to a new OAuth provider ===");
    graph.add_auth_provider_node(AuthKind::OAuth, "github", "GitHub", true, Default::default())?;
    match graph.plan_connect(&Connection::new("tool-weather", "auth-provider-github")) {
        Ok(change) => println!("persist: PATCH /tools/{} {}", change.tool_id, change.to_patch()),
        Err(e) => println!("rejected: {}", e),
    }

    println!("\n=== Deleting the Google node ===");
    let plan = graph.plan_delete(&["auth-provider-calendar-google"]);
    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}
