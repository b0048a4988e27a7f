use anyhow::Context;

use ticket_router::app;
use ticket_router::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    eprintln!("🎫 Ticket Router v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Tickets:  {}", config.tickets_path.display());
    eprintln!("   Managers: {}", config.managers_path.display());
    eprintln!("   Units:    {}", config.units_path.display());
    eprintln!("   Output:   {}", config.output_path.display());
    eprintln!(
        "   Classifier: {}",
        match &config.llm {
            Some(llm) => llm.model.as_str(),
            None => "keyword rules",
        }
    );
    eprintln!(
        "   Fallback: {}",
        if config.distribution.enable_fallback {
            "enabled"
        } else {
            "disabled"
        }
    );

    let report = app::run(&config).await.context("distribution run failed")?;

    eprintln!();
    eprintln!("   Run:        {}", report.run_id);
    eprintln!("   Tickets:    {}", report.results.len());
    eprintln!("   Assigned:   {}", report.assigned);
    eprintln!("   Unassigned: {}", report.unassigned);
    eprintln!("   Escalated:  {}", report.escalated);
    eprintln!("   Fallback:   {}", report.fallback);
    eprintln!("   Saved:      {}", config.output_path.display());

    Ok(())
}
