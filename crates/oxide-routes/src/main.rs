//! oxide-routes CLI
//!
//! Command-line tool for inspecting a route table.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_routing::{Config, Method, Params, Request, Router};

/// Inspect a route table: list routes, resolve paths, build URLs.
#[derive(Parser)]
#[command(name = "oxide-routes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route table (JSON).
    #[arg(short, long, env = "OXIDE_ROUTES_CONFIG", default_value = "routes.json")]
    config: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes in match order.
    List,

    /// Resolve a path to a controller and action.
    Match {
        /// Request path.
        path: String,

        /// HTTP method.
        #[arg(short, long, default_value = "GET")]
        method: String,
    },

    /// Generate a URL from a route name or routing keys.
    Url {
        /// Route name (placeholders are left in place).
        #[arg(short, long, conflicts_with_all = ["controller", "action", "prefix", "plugin", "param"])]
        name: Option<String>,

        /// Controller.
        #[arg(short, long)]
        controller: Option<String>,

        /// Action.
        #[arg(short, long)]
        action: Option<String>,

        /// Prefix.
        #[arg(long)]
        prefix: Option<String>,

        /// Plugin.
        #[arg(long)]
        plugin: Option<String>,

        /// Placeholder value, as key=value.
        #[arg(short, long = "param", value_parser = parse_key_val)]
        param: Vec<(String, String)>,

        /// Prepend the configured base URL.
        #[arg(long)]
        full: bool,
    },
}

/// Parses a `key=value` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn render_routes(router: &Router) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for route in router.routes() {
        writeln!(
            out,
            "{:<16} {:<7} /{:<28} {}#{}{}{}",
            route.name(),
            route.method().to_string(),
            route.pattern().template(),
            route.controller(),
            route.action(),
            route
                .prefix()
                .map(|p| format!(" prefix={p}"))
                .unwrap_or_default(),
            route
                .plugin()
                .map(|p| format!(" plugin={p}"))
                .unwrap_or_default(),
        )?;
    }
    Ok(out)
}

fn render_match(request: &Request) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "path:       {}", request.path)?;
    writeln!(out, "controller: {}", request.controller)?;
    writeln!(out, "action:     {}", request.effective_action())?;
    if let Some(prefix) = &request.prefix {
        writeln!(out, "prefix:     {prefix}")?;
    }
    if let Some(plugin) = &request.plugin {
        writeln!(out, "plugin:     {plugin}")?;
    }
    writeln!(out, "parameters: [{}]", request.parameters.join(", "))?;
    let mut named: Vec<_> = request.params.iter().collect();
    named.sort_unstable();
    for (key, value) in named {
        writeln!(out, "  {key} = {value}")?;
    }
    Ok(out)
}

fn run(router: &Router, command: Commands) -> anyhow::Result<String> {
    match command {
        Commands::List => Ok(render_routes(router)?),

        Commands::Match { path, method } => {
            let method: Method = method.parse()?;
            let mut request = Request::new(method, path);
            router.parse(&mut request)?;
            Ok(render_match(&request)?)
        }

        Commands::Url {
            name,
            controller,
            action,
            prefix,
            plugin,
            param,
            full,
        } => {
            let url = match name {
                Some(name) => router.url(name.as_str(), full)?,
                None => {
                    let mut params: Params = param.into_iter().collect();
                    let keys = [
                        ("controller", controller),
                        ("action", action),
                        ("prefix", prefix),
                        ("plugin", plugin),
                    ];
                    for (key, value) in keys {
                        if let Some(value) = value {
                            params.insert(key, value);
                        }
                    }
                    router.url(&params, full)?
                }
            };
            Ok(format!("{url}\n"))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!(config = %cli.config.display(), "loading route table");
    let config = Config::from_path(&cli.config)?;
    let router = config.build_router()?;
    info!(
        routes = router.routes().count(),
        "loaded {}",
        cli.config.display()
    );

    print!("{}", run(&router, cli.command)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Config::from_json_str(
            r#"{
                "app": { "base_url": "https://example.com" },
                "prefixes": [{ "url_key": "admin", "prefix": "admin" }],
                "routes": [
                    { "template": "posts/:id", "controller": "posts", "action": "show", "name": "post" },
                    { "template": "posts", "controller": "posts", "prefix": "admin", "plugin": "blog" }
                ]
            }"#,
        )
        .unwrap()
        .build_router()
        .unwrap()
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("id=42").unwrap(),
            ("id".to_string(), "42".to_string())
        );
        assert_eq!(
            parse_key_val("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("id").is_err());
        assert!(parse_key_val("=1").is_err());
    }

    #[test]
    fn test_list() {
        let out = run(&router(), Commands::List).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("post"));
        assert!(lines[0].contains("posts#show"));
        assert!(lines[1].contains("/admin/posts"));
        assert!(lines[1].contains("prefix=admin plugin=blog"));
    }

    #[test]
    fn test_match() {
        let out = run(
            &router(),
            Commands::Match {
                path: "/admin/posts".to_string(),
                method: "get".to_string(),
            },
        )
        .unwrap();
        assert!(out.contains("controller: posts"));
        assert!(out.contains("action:     admin_index"));
        assert!(out.contains("plugin:     blog"));
    }

    #[test]
    fn test_match_bad_method() {
        let result = run(
            &router(),
            Commands::Match {
                path: "/".to_string(),
                method: "BREW".to_string(),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_url() {
        let out = run(
            &router(),
            Commands::Url {
                name: None,
                controller: Some("posts".to_string()),
                action: Some("show".to_string()),
                prefix: None,
                plugin: None,
                param: vec![("id".to_string(), "9".to_string())],
                full: true,
            },
        )
        .unwrap();
        assert_eq!(out, "https://example.com/posts/9\n");

        let out = run(
            &router(),
            Commands::Url {
                name: Some("post".to_string()),
                controller: None,
                action: None,
                prefix: None,
                plugin: None,
                param: Vec::new(),
                full: false,
            },
        )
        .unwrap();
        assert_eq!(out, "/posts/:id\n");
    }
}
