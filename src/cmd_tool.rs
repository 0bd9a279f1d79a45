//! `tool` subcommand: list and run tool adapters.

use agentcore_protocols::tool::ToolContext;

use crate::app::App;
use crate::cli::ToolAction;

pub(crate) async fn handle_tool_command(
    app: &App,
    action: ToolAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let tools = app.tools();
    match action {
        ToolAction::List => {
            println!("{:<14} {:<8} {}", "ID", "RISK", "DESCRIPTION");
            println!("{}", "-".repeat(60));
            for tool in &tools {
                let def = tool.definition();
                let risk = format!("{:?}", def.risk_level);
                println!("{:<14} {:<8} {}", def.id, risk, def.description);
            }
            Ok(())
        }
        ToolAction::Run { id, params } => {
            let tool = tools
                .iter()
                .find(|t| t.definition().id == id)
                .ok_or_else(|| format!("Unknown tool: {}", id))?;
            let params: serde_json::Value = serde_json::from_str(&params)?;
            let ctx = ToolContext::new("cli", app.work_dir.clone());

            let result = tool.execute(params, ctx).await?;
            if result.success {
                println!("{}", result.content);
            } else {
                eprintln!("{}", result.error.unwrap_or_default());
            }
            if !result.metadata.is_empty() {
                eprintln!("{}", serde_json::to_string(&result.metadata)?);
            }
            Ok(())
        }
    }
}
