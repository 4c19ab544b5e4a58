use clap::{Parser, Subcommand};
use std::path::PathBuf;

use plategate::core::db::{
    DeleteOutcome, Gate, GateLogRepository, PlateRegistry, PlateRepository, RenameOutcome,
};
use plategate::{GateController, GateDecision, PlateRecognizer, RecognitionConfig, Registration};

#[derive(Parser)]
#[command(name = "plategate")]
#[command(about = "Recognize license plates and control gate access")]
struct Cli {
    /// Registry database file
    #[arg(long, value_name = "FILE", default_value = "license_plates.db")]
    db: PathBuf,

    /// JSON file with recognition parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the OCR models (overrides the config file)
    #[arg(long, value_name = "DIR")]
    models: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plate read from an image
    Recognize {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
    },
    /// Register the plate read from an image
    Register {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
    },
    /// Verify a vehicle at the entry gate
    Entry {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
    },
    /// Verify a vehicle at the exit gate
    Exit {
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,
    },
    /// Delete a registered plate
    Delete { plate: String },
    /// Change a registered plate number
    Rename { old: String, new: String },
    /// List registered vehicles
    List,
    /// Show the entry log
    EntryLog,
    /// Show the exit log
    ExitLog,
    /// Remove all registrations and logs
    Clear,
}

fn load_config(cli: &Cli) -> anyhow::Result<RecognitionConfig> {
    let mut config = match &cli.config {
        Some(path) => RecognitionConfig::from_file(path)?,
        None => RecognitionConfig::default(),
    };
    if let Some(dir) = &cli.models {
        config.ocr.model_dir = Some(dir.clone());
    }
    Ok(config)
}

fn print_events(title: &str, events: &[plategate::core::db::GateEvent]) {
    if events.is_empty() {
        println!("No {} logs.", title.to_lowercase());
        return;
    }
    println!("{} Logs:", title);
    for event in events {
        println!("Plate Number: {}", event.plate_number);
        println!("{} Time: {}", title, event.time);
        println!("------------");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(&cli)?;

    let registry = PlateRegistry::open(&cli.db).await?;
    let controller = GateController::new(PlateRecognizer::with_ocrs(config), registry);
    let result = run(&controller, &cli.command).await;
    controller.close().await?;
    result
}

async fn run(controller: &GateController, command: &Command) -> anyhow::Result<()> {
    let registry = controller.registry();
    match command {
        Command::Recognize { image_path } => match controller.read_plate(image_path).await? {
            Some(plate) => println!("Detected License Plate Number: {}", plate),
            None => println!("No license plate detected in the image"),
        },
        Command::Register { image_path } => match controller.register_from_image(image_path).await? {
            Registration::Registered(plate) => {
                println!("Detected License Plate Number: {}", plate);
                println!("License plate registered successfully.");
            }
            Registration::AlreadyExists(plate) => {
                println!("Detected License Plate Number: {}", plate);
                println!("License plate already exists in the database.");
            }
            Registration::NoPlate => println!("No license plate detected in the image"),
        },
        Command::Entry { image_path } => {
            report_decision(controller.verify(image_path, Gate::Entry).await?, "Access")
        }
        Command::Exit { image_path } => {
            report_decision(controller.verify(image_path, Gate::Exit).await?, "Exit")
        }
        Command::Delete { plate } => match registry.delete_plate(plate).await? {
            DeleteOutcome::Deleted => println!("License plate deleted successfully."),
            DeleteOutcome::NotFound => println!("License plate not found."),
        },
        Command::Rename { old, new } => match registry.rename_plate(old, new).await? {
            RenameOutcome::Renamed => println!("License plate modified successfully."),
            RenameOutcome::NotFound => println!("License plate not found."),
            RenameOutcome::Conflict => println!("License plate already exists in the database."),
        },
        Command::List => {
            let plates = registry.get_plates().await?;
            if plates.is_empty() {
                println!("No registered vehicles.");
            } else {
                println!("Registered Vehicles:");
                for plate in plates {
                    println!("{}", plate.plate_number);
                }
            }
        }
        Command::EntryLog => print_events("Entry", &registry.get_entry_logs().await?),
        Command::ExitLog => print_events("Exit", &registry.get_exit_logs().await?),
        Command::Clear => {
            registry.clear_all().await?;
            println!("Database cleared successfully.");
        }
    }
    Ok(())
}

fn report_decision(decision: GateDecision, granted_label: &str) {
    match decision {
        GateDecision::Granted(plate) => {
            println!("{} granted. License plate is authorized: {}", granted_label, plate)
        }
        GateDecision::Denied(_) => println!("Access denied. License plate is not authorized."),
        GateDecision::NoPlate => println!("No license plate detected in the image"),
    }
}
