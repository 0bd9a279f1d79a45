//! Skill subcommand handlers.

use tracing::info;

use agentcore_protocols::skill::Skill;

use crate::app::App;
use crate::cli::SkillAction;

/// Handle skill subcommands.
pub(crate) async fn handle_skill_command(
    app: &App,
    action: SkillAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SkillAction::List { format } => skill_list(app, &format).await,
        SkillAction::Show { name } => skill_show(app, &name).await,
        SkillAction::Render { name, args } => skill_render(app, &name, &args).await,
    }
}

async fn skill_list(app: &App, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let registry = app.load_skills().await?;
    let catalog = registry.catalog();

    if catalog.is_empty() {
        println!("No skills found.");
        return Ok(());
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        _ => {
            println!(
                "{:<24} {:<11} {:<11} {:<7} {}",
                "NAME", "SCOPE", "INVOCABLE", "MODE", "DESCRIPTION"
            );
            println!("{}", "-".repeat(80));
            for entry in catalog {
                let invocable = match (entry.user_invocable, entry.model_invocable) {
                    (true, true) => "user,model",
                    (true, false) => "user",
                    (false, true) => "model",
                    (false, false) => "-",
                };
                let mode = if entry.fork_context { "fork" } else { "inline" };
                println!(
                    "{:<24} {:<11} {:<11} {:<7} {}",
                    entry.name, entry.scope, invocable, mode, entry.description
                );
            }
        }
    }

    Ok(())
}

async fn skill_show(app: &App, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let registry = app.load_skills().await?;
    let skill = registry.get(name)?;

    println!("Skill: {}", skill.name);
    println!("{}", "=".repeat(50));
    println!("Description: {}", skill.description);
    println!("Scope:       {} (priority {})", skill.scope, skill.priority);
    println!("Mode:        {}", if skill.fork_context { "fork" } else { "inline" });
    println!("User:        {}", skill.user_invocable);
    println!("Model:       {}", skill.model_invocable);
    if let Some(limit) = &skill.rate_limit {
        println!("Rate limit:  {}", limit);
    }
    if !skill.allowed_tools.is_empty() {
        println!("Tools:       {}", skill.allowed_tools.join(", "));
    }
    if let Some(path) = &skill.source_path {
        println!("Source:      {}", path.display());
    }

    let shadowed: Vec<Skill> = registry
        .registrations(name)
        .into_iter()
        .filter(|s| s.source_path != skill.source_path || s.priority != skill.priority)
        .collect();
    if !shadowed.is_empty() {
        println!("\nShadowed registrations:");
        for s in shadowed {
            let source = s
                .source_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  - {} (priority {}): {}", s.scope, s.priority, source);
        }
    }

    println!("\nBody:");
    println!("{}", "-".repeat(50));
    let preview: String = skill.body.chars().take(500).collect();
    println!("{}", preview);
    let total = skill.body.chars().count();
    if total > 500 {
        println!("... ({} more characters)", total - 500);
    }

    Ok(())
}

async fn skill_render(
    app: &App,
    name: &str,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = app.load_skills().await?;
    let skill = registry.get(name)?;

    let rendered = app.preprocessor().render(&skill, args).await;
    info!("Rendered skill {} with {} args", name, args.len());

    if !rendered.allowed_tools.is_empty() {
        eprintln!("Allowed tools: {}", rendered.allowed_tools.join(", "));
    }
    println!("{}", rendered.prompt);

    Ok(())
}
