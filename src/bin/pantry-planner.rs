use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use pantry_planner::config::PlannerConfig;
use pantry_planner::nutrition::DailyTargets;
use pantry_planner::validation::ensure_valid;
use pantry_planner::{
    relax, validate_duration, ActivityLevel, Biometrics, Catalog, DurationTier, PantrySelection,
    PlannerClient, PlanningWorkflow, Sex,
};

#[derive(Parser)]
#[command(name = "pantry-planner", about = "Plan a diet from the ingredients you own")]
struct Cli {
    /// Diet service URL (overrides PLANNER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog ingredients
    Catalog {
        /// Only show ingredients whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Compute daily nutrition targets
    Nutrition(BiometricArgs),
    /// Check a pantry against a duration's ingredient rules
    Check {
        #[arg(long)]
        duration: DurationTier,
        #[command(flatten)]
        pantry: PantryArgs,
    },
    /// Save a pantry and generate a diet for it
    Plan {
        #[arg(long)]
        duration: DurationTier,
        #[command(flatten)]
        pantry: PantryArgs,
        #[command(flatten)]
        biometrics: BiometricArgs,
    },
}

#[derive(Args)]
struct BiometricArgs {
    /// Age in years
    #[arg(long)]
    age: u32,
    /// male or female
    #[arg(long)]
    sex: Sex,
    #[arg(long)]
    height_cm: f64,
    #[arg(long)]
    weight_kg: f64,
    /// sedentary, light, moderate, active or very_active
    #[arg(long, default_value = "moderate")]
    activity: ActivityLevel,
}

impl BiometricArgs {
    fn to_biometrics(&self) -> Biometrics {
        Biometrics {
            age: self.age,
            sex: self.sex,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity_level: self.activity,
        }
    }
}

#[derive(Args)]
struct PantryArgs {
    /// Comma-separated ingredient ids
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    ingredients: Vec<String>,
    /// Select every catalog ingredient
    #[arg(long)]
    all: bool,
}

impl PantryArgs {
    fn to_selection(&self, catalog: &Catalog) -> Result<PantrySelection> {
        let mut selection = PantrySelection::new();
        if self.all {
            selection.select_all(catalog);
        } else {
            for id in &self.ingredients {
                if catalog.get(id).is_none() {
                    tracing::warn!("Ingredient {} is not in the catalog", id);
                }
                selection.add(id.as_str());
            }
        }
        if selection.is_empty() {
            bail!("Select ingredients with --ingredients or --all");
        }
        Ok(selection)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PlannerConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
        config.validate()?;
    }
    let catalog = config.load_catalog()?;

    match cli.command {
        Commands::Catalog { search } => {
            let ingredients: Vec<_> = match search {
                Some(query) => catalog.search(&query),
                None => catalog.iter().collect(),
            };
            for ingredient in ingredients {
                println!("{:<20} {:<24} {}", ingredient.id, ingredient.name, ingredient.category);
            }
        }
        Commands::Nutrition(args) => {
            let targets = DailyTargets::calculate(&args.to_biometrics())?;
            print_json(&serde_json::json!({
                "daily": targets.rounded(),
                "range": targets.to_range(),
            }))?;
        }
        Commands::Check { duration, pantry } => {
            let selection = pantry.to_selection(&catalog)?;
            let deficiencies = validate_duration(&selection, &catalog, duration);
            if deficiencies.is_empty() {
                println!("Pantry of {} items is enough for a {}", selection.len(), duration);
            } else {
                println!("Cannot generate a {} diet. Please add:", duration);
                for deficiency in deficiencies {
                    println!("  - {}", deficiency);
                }
            }
        }
        Commands::Plan {
            duration,
            pantry,
            biometrics,
        } => {
            let selection = pantry.to_selection(&catalog)?;
            ensure_valid(&selection, &catalog, duration)?;

            let range = DailyTargets::calculate(&biometrics.to_biometrics())?.to_range();

            let client = PlannerClient::from_config(&config)?;
            let workflow = PlanningWorkflow::new(client);
            workflow.calculate_nutrition(range);
            workflow
                .save_pantry(selection)
                .await
                .context("Failed to save pantry")?;

            tracing::info!("Requesting a {}-day plan", duration.days());
            let diet = workflow
                .generate(duration, Some(relax(&range)))
                .await
                .context("Failed to generate diet")?;
            if diet.is_empty() {
                bail!("The diet service found no recipes covering every meal for this pantry");
            }
            print_json(&diet)?;
        }
    }

    Ok(())
}
