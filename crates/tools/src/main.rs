use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use artifact_tools::config::Config;
use artifact_tools::stellar::StellarCli;

#[derive(Parser)]
#[command(name = "artifact")]
#[command(about = "Artifact registry deployment and curator maintenance tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the registry contract and initialize it
    Deploy {
        /// Contract WASM file path
        #[arg(short, long)]
        wasm: String,
        /// Curator (owner) address
        #[arg(long)]
        owner: String,
        /// Payment token contract address
        #[arg(long)]
        token: String,
        /// Initial print fee, in payment token units
        #[arg(long)]
        fee: i128,
    },
    /// Publish a new artifact (owner only)
    Publish {
        /// Curator address authorizing the call
        #[arg(long)]
        caller: String,
        /// Opaque metadata reference string
        #[arg(long)]
        uri: String,
    },
    /// Update the print fee (owner only)
    UpdateFee {
        #[arg(long)]
        caller: String,
        /// New fee, in payment token units
        #[arg(long)]
        fee: i128,
    },
    /// Withdraw accumulated print fees (owner only)
    Withdraw {
        #[arg(long)]
        caller: String,
    },
    /// Invoke a read-only query, e.g. `query fee` or `query owner_of id=1`
    Query {
        /// Query function name
        function: String,
        /// Arguments as name=value pairs
        args: Vec<String>,
    },
    /// Show the resolved network configuration
    Config {
        /// Validate configuration files
        #[arg(short, long)]
        validate: bool,
        /// Print as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn parse_query_args(raw: &[String]) -> Result<Vec<(&str, String)>> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| (name, value.to_string()))
                .with_context(|| format!("expected name=value, got: {}", pair))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy {
            wasm,
            owner,
            token,
            fee,
        } => {
            let config = Config::load()?;
            let stellar = StellarCli::new(config);

            let contract_id = stellar.run(&stellar.deploy_command(&wasm)).await?;
            println!("Registry deployed: {}", contract_id);

            let init_args = stellar.invoke_command(
                &contract_id,
                "init",
                &[
                    ("owner", owner),
                    ("payment_token", token),
                    ("fee", fee.to_string()),
                ],
            );
            stellar.run(&init_args).await?;
            println!("Registry initialized with fee {}", fee);
            Ok(())
        }
        Commands::Publish { caller, uri } => {
            let config = Config::load()?;
            let contract_id = config.require_contract_id()?.to_string();
            let stellar = StellarCli::new(config);

            let args = stellar.invoke_command(
                &contract_id,
                "publish",
                &[("caller", caller), ("uri", uri)],
            );
            let id = stellar.run(&args).await?;
            println!("Published artifact {}", id);
            Ok(())
        }
        Commands::UpdateFee { caller, fee } => {
            let config = Config::load()?;
            let contract_id = config.require_contract_id()?.to_string();
            let stellar = StellarCli::new(config);

            let args = stellar.invoke_command(
                &contract_id,
                "update_fee",
                &[("caller", caller), ("new_fee", fee.to_string())],
            );
            stellar.run(&args).await?;
            println!("Fee updated to {}", fee);
            Ok(())
        }
        Commands::Withdraw { caller } => {
            let config = Config::load()?;
            let contract_id = config.require_contract_id()?.to_string();
            let stellar = StellarCli::new(config);

            let args =
                stellar.invoke_command(&contract_id, "withdraw", &[("caller", caller)]);
            let amount = stellar.run(&args).await?;
            println!("Withdrew {}", amount);
            Ok(())
        }
        Commands::Query { function, args } => {
            let config = Config::load()?;
            let contract_id = config.require_contract_id()?.to_string();
            let stellar = StellarCli::new(config);

            let fn_args = parse_query_args(&args)?;
            let invoke = stellar.invoke_command(&contract_id, &function, &fn_args);
            let output = stellar.run(&invoke).await?;
            println!("{}", output);
            Ok(())
        }
        Commands::Config { validate, json } => {
            let config = Config::load()?;
            if json {
                println!("{}", config.to_json()?);
            } else {
                config.print_summary();
            }
            if validate {
                println!("Configuration OK");
            }
            Ok(())
        }
    }
}
