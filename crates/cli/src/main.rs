use clap::Parser;
use ferrous_resolver_application::{QueryOutcome, Resolver};
use ferrous_resolver_domain::{CliOverrides, Config, DomainName, RecordType};
use ferrous_resolver_infrastructure::create_transport;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ferrous-resolver")]
#[command(version)]
#[command(about = "Iterative DNS resolver - walks the delegation tree from the root hints")]
struct Cli {
    /// Domain name to resolve
    domain: String,

    /// Record type (A, AAAA, MX, NS, TXT, ANY, ...)
    #[arg(default_value = "A")]
    record_type: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Resolve over IPv4 only
    #[arg(short = '4', long)]
    ipv4: bool,

    /// Resolve over IPv6 only
    #[arg(short = '6', long)]
    ipv6: bool,

    /// Per-exchange timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Print every delegation step
    #[arg(long)]
    trace: bool,

    /// Find the authoritative name servers instead of answer records
    #[arg(long)]
    ns: bool,

    /// Check whether the domain can receive mail
    #[arg(long)]
    mail: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        ipv4_only: cli.ipv4,
        ipv6_only: cli.ipv6,
        query_timeout: cli.timeout,
    };
    let config = Config::load(cli.config.as_deref(), cli_overrides)?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    debug!(
        timeout_ms = config.transport.query_timeout,
        ip_preference = ?config.resolver.ip_preference,
        "configuration loaded"
    );

    let domain: DomainName = cli.domain.parse()?;
    let record_type: RecordType = cli
        .record_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let transport = create_transport(&config.transport, config.resolver.retry_tcp_on_truncation);
    let resolver = Resolver::new(transport, config.resolver.clone());

    if cli.ns {
        let (servers, authoritative) = resolver.find_authoritative_name_servers(&domain).await?;
        println!(
            "; zone {} ({})",
            servers.zone(),
            if authoritative { "authoritative" } else { "referral" }
        );
        for server in servers.iter() {
            let addrs: Vec<String> = server.addresses().iter().map(|a| a.to_string()).collect();
            println!("{}\t{}", server.name(), addrs.join(" "));
        }
        return Ok(());
    }

    if cli.mail {
        let can = resolver.can_receive_mail(&domain).await?;
        println!(
            "{} {} receive mail",
            domain,
            if can { "can" } else { "cannot" }
        );
        return Ok(());
    }

    let resolution = resolver.resolve(&domain, record_type).await?;

    if cli.trace {
        for (i, step) in resolution.steps.iter().enumerate() {
            println!(
                "; step {}: zone {} @ {} -> {} ({} ms)",
                i + 1,
                step.authorities.zone(),
                step.server,
                step.outcome.label(),
                step.duration().num_milliseconds()
            );
        }
    }

    match &resolution.outcome {
        QueryOutcome::AuthoritativeAnswer { records, .. }
        | QueryOutcome::NonAuthoritativeAnswer { records } => {
            for record in records {
                println!("{}", record);
            }
        }
        other => {
            println!("; no answer: {}", other.label());
            std::process::exit(1);
        }
    }

    Ok(())
}
