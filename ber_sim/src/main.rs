//! BER sweep driver
//!
//! Runs the full modulate -> channel -> demodulate pipeline per
//! modulation order across a sigma sweep, one worker thread per order,
//! and writes one `sigma,ber` CSV per order. The `constellation`
//! subcommand exports the default maps with gnuplot scripts instead.

use std::error::Error;
use std::path::PathBuf;
use std::thread;

use clap::{Parser, Subcommand};
use log::info;

use phy_qam::{Mapper, ModulationOrder};

mod csv;
mod plot;
mod sim;

use sim::SweepConfig;

type DriverError = Box<dyn Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "ber-sim")]
#[command(about = "Monte-Carlo BER measurement for QPSK/16-QAM/64-QAM over AWGN")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep sigma and write one sigma,ber CSV per modulation order
    Sweep {
        /// First noise level of the sweep
        #[arg(long, default_value = "0.0")]
        sigma_start: f64,

        /// Exclusive end of the sweep
        #[arg(long, default_value = "10.0")]
        sigma_end: f64,

        /// Sweep increment
        #[arg(long, default_value = "0.02")]
        sigma_step: f64,

        /// Monte-Carlo iterations per noise level
        #[arg(short, long, default_value = "100000")]
        iterations: usize,

        /// RNG seed for payloads and noise
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Directory for the CSV files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Export the default constellation maps with gnuplot scripts
    Constellation {
        /// Directory for the .dat/.plt files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Omit the symbol-index annotations
        #[arg(long)]
        no_indices: bool,
    },
}

fn main() -> Result<(), DriverError> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep {
            sigma_start,
            sigma_end,
            sigma_step,
            iterations,
            seed,
            out_dir,
        } => {
            let config = SweepConfig {
                sigma_start,
                sigma_end,
                sigma_step,
                iterations,
                seed,
            };
            sweep_command(&config, &out_dir)?;
        }
        Commands::Constellation { out_dir, no_indices } => {
            constellation_command(&out_dir, !no_indices)?;
        }
    }

    Ok(())
}

fn csv_name(order: ModulationOrder) -> &'static str {
    match order {
        ModulationOrder::Qpsk => "ber_sigma_qpsk.csv",
        ModulationOrder::Qam16 => "ber_sigma_qam16.csv",
        ModulationOrder::Qam64 => "ber_sigma_qam64.csv",
    }
}

/// One worker per modulation order; each owns a complete pipeline and
/// shares nothing but the log sink.
fn sweep_command(config: &SweepConfig, out_dir: &PathBuf) -> Result<(), DriverError> {
    std::fs::create_dir_all(out_dir)?;

    let results: Vec<Result<(), DriverError>> = thread::scope(|scope| {
        let handles: Vec<_> = ModulationOrder::ALL
            .into_iter()
            .map(|order| {
                scope.spawn(move || -> Result<(), DriverError> {
                    info!("testing {order}");
                    let points = sim::run_sweep(order, config)?;

                    let path = out_dir.join(csv_name(order));
                    csv::write_sweep(&path, &points)?;
                    info!("completed {order}, results saved to {}", path.display());
                    Ok(())
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(_) => Err("sweep worker panicked".into()),
            })
            .collect()
    });

    for result in results {
        result?;
    }
    Ok(())
}

fn constellation_command(out_dir: &PathBuf, indices: bool) -> Result<(), DriverError> {
    std::fs::create_dir_all(out_dir)?;

    for order in ModulationOrder::ALL {
        let mapper = Mapper::new(order);
        let base = out_dir.join(format!("{}_constellation", order.to_string().to_lowercase()));
        let (data_path, script_path) = plot::save_and_plot_constellation(&mapper, &base, indices)?;
        info!(
            "exported {order}: {} / {}",
            data_path.display(),
            script_path.display()
        );
    }
    Ok(())
}
