use anyhow::Result;
use clap::{Parser, Subcommand};
use devclass_core::observability::DEFAULT_LOG_LEVEL;
use devclass_core::{ClassifierConfig, DeviceClassifier};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "devclass")]
#[command(about = "Classify host PCI and VFIO devices for passthrough", long_about = None)]
struct Cli {
    /// Sysfs mount point (default: $DEVCLASS_SYSFS_ROOT or /sys)
    #[arg(long, global = true)]
    sysfs_root: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a BDF qualified with the default domain
    Normalize {
        /// PCI address (e.g., "04:00.0" or "0000:04:00.0")
        bdf: String,
    },

    /// Show how a device file name is parsed
    Parse {
        /// Device file base name (PCI address or mdev UUID)
        name: String,
    },

    /// Read a PCI device attribute
    Property {
        /// PCI address
        bdf: String,

        /// Attribute name (e.g., "class", "vendor")
        name: String,
    },

    /// Read a PCI slot attribute
    SlotProperty {
        /// Slot name as listed under /sys/bus/pci/slots
        slot: String,

        /// Attribute name (e.g., "address", "max_bus_speed")
        name: String,
    },

    /// Report whether a device (or slot) is PCI-Express
    Express {
        /// PCI address, or slot name with --slot
        id: String,

        /// Judge a slot by its max_bus_speed instead of a device's config space
        #[arg(long)]
        slot: bool,
    },

    /// Classify VFIO device paths
    Classify {
        /// Device paths (e.g., /sys/kernel/iommu_groups/3/devices/0000:01:00.0)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List the APQNs of a VFIO-AP mediated device
    ApMatrix {
        /// Mediated device path (links are resolved)
        device: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    devclass_core::init_observability(&cli.log_level)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let classifier = DeviceClassifier::new(load_config(&cli)?);

    match cli.command {
        Commands::Normalize { bdf } => {
            println!("{}", classifier.normalize_bdf(&bdf));
        }

        Commands::Parse { name } => {
            commands::pci::parse(&name);
        }

        Commands::Property { bdf, name } => {
            commands::pci::property(&classifier, &bdf, &name);
        }

        Commands::SlotProperty { slot, name } => {
            commands::pci::slot_property(&classifier, &slot, &name);
        }

        Commands::Express { id, slot } => {
            commands::pci::express(&classifier, &id, slot);
        }

        Commands::Classify { paths, json } => {
            commands::vfio::classify(&classifier, &paths, json)?;
        }

        Commands::ApMatrix { device } => {
            commands::vfio::ap_matrix(&classifier, &device)?;
        }

        Commands::Config => {
            commands::config::show(classifier.config())?;
        }
    }

    Ok(())
}

/// Config file first, then `--sysfs-root` re-roots every sysfs directory.
fn load_config(cli: &Cli) -> Result<ClassifierConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            ClassifierConfig::load(path)?
        }
        None => ClassifierConfig::default(),
    };

    if let Some(root) = &cli.sysfs_root {
        let rooted = ClassifierConfig::with_sysfs_root(root);
        config.pci_devices_dir = rooted.pci_devices_dir;
        config.pci_slots_dir = rooted.pci_slots_dir;
        config.vfio_ap_dir = rooted.vfio_ap_dir;
    }

    Ok(config)
}
