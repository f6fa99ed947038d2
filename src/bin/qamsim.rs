//! QAM Minimum-Phase Dataset Generator
//!
//! Generate a synthetic QAM signal, transform it to its minimum-phase
//! representation, and slice the amplitude/phase traces into supervised
//! train/test datasets for phase-recovery experiments.
//!
//! Usage:
//!   cargo run --bin qamsim -- [OPTIONS]
//!   qamsim [OPTIONS]
//!
//! Options:
//!   -M, --order <M>       QAM modulation order (default: 64)
//!   -b, --baud <Hz>       Symbol rate in Hz (default: 40e9)
//!   -p, --sps <n>         Samples per symbol (default: 4)
//!   -s, --snr <dB>        Signal-to-noise ratio in dB (default: 40)
//!   -r, --rolloff <a>     Pulse-shaping roll-off factor (default: 0.01)
//!   -w, --window <n>      Amplitude window order (default: 8)
//!   -z, --size <n>        Dataset rows (default: 60000)
//!   -a, --align <policy>  Target alignment: last | center | first (default: last)
//!   -g, --grid            Build the 2-D grid (CNN) variant instead
//!       --seed <n>        RNG seed for reproducible runs
//!   -o, --output <prefix> Output file prefix (default: dataset)
//!       --plot            Also render constellation and spectrum plots
//!   -h, --help            Show this help message
//!
//! Examples:
//!   # 64-QAM defaults, datasets written to dataset_train.csv / dataset_test.csv
//!   qamsim
//!
//!   # 16-QAM, center-aligned targets, reproducible
//!   qamsim -M 16 -a center --seed 42 -o run16

use minphase::dataset::{self, TargetAlign};
use minphase::export::{write_dataset_csv, write_grid_dataset_csv};
use minphase::filter::{lowpass_filter, normalize_and_center};
use minphase::plot::{plot_constellation, plot_spectrum};
use minphase::tracing_init::init_tracing;
use minphase::{
    generate_qam, simulate_transmission, split_mode, to_minimum_phase, SignalConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Excess bandwidth of the post-transmission lowpass.
const LOWPASS_EXCESS_BW: f64 = 0.001;
/// Tap count of the post-transmission lowpass.
const LOWPASS_TAPS: usize = 4001;

struct SimConfig {
    signal: SignalConfig,
    window_order: usize,
    size: usize,
    align: TargetAlign,
    grid: bool,
    seed: Option<u64>,
    output_prefix: String,
    plot: bool,
}

impl SimConfig {
    fn parse_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();

        let mut signal = SignalConfig {
            num_modes: 2, // mode 0 -> train, mode 1 -> test
            ..SignalConfig::default()
        };
        let mut window_order = 8;
        let mut size = dataset::DEFAULT_SIZE;
        let mut align = TargetAlign::Last;
        let mut grid = false;
        let mut seed = None;
        let mut output_prefix = "dataset".to_string();
        let mut plot = false;

        fn value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, String> {
            *i += 1;
            args.get(*i)
                .map(String::as_str)
                .ok_or_else(|| format!("Missing value for {}", args[*i - 1]))
        }

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-M" | "--order" => {
                    let v = value(&args, &mut i)?;
                    signal.modulation_order =
                        v.parse().map_err(|_| format!("Invalid order: {v}"))?;
                }
                "-b" | "--baud" => {
                    let v = value(&args, &mut i)?;
                    signal.symbol_rate =
                        v.parse().map_err(|_| format!("Invalid symbol rate: {v}"))?;
                }
                "-p" | "--sps" => {
                    let v = value(&args, &mut i)?;
                    signal.samples_per_symbol =
                        v.parse().map_err(|_| format!("Invalid sps: {v}"))?;
                }
                "-s" | "--snr" => {
                    let v = value(&args, &mut i)?;
                    signal.snr_db = v.parse().map_err(|_| format!("Invalid SNR: {v}"))?;
                }
                "-r" | "--rolloff" => {
                    let v = value(&args, &mut i)?;
                    signal.rolloff = v.parse().map_err(|_| format!("Invalid rolloff: {v}"))?;
                }
                "-w" | "--window" => {
                    let v = value(&args, &mut i)?;
                    window_order = v.parse().map_err(|_| format!("Invalid window: {v}"))?;
                }
                "-z" | "--size" => {
                    let v = value(&args, &mut i)?;
                    size = v.parse().map_err(|_| format!("Invalid size: {v}"))?;
                }
                "-a" | "--align" => {
                    align = match value(&args, &mut i)? {
                        "last" => TargetAlign::Last,
                        "center" => TargetAlign::Center,
                        "first" => TargetAlign::First,
                        other => return Err(format!("Unknown alignment: {other}")),
                    };
                }
                "-g" | "--grid" => grid = true,
                "--seed" => {
                    let v = value(&args, &mut i)?;
                    seed = Some(v.parse().map_err(|_| format!("Invalid seed: {v}"))?);
                }
                "-o" | "--output" => {
                    output_prefix = value(&args, &mut i)?.to_string();
                }
                "--plot" => plot = true,
                "-h" | "--help" => {
                    print_help(&args[0]);
                    std::process::exit(0);
                }
                arg => return Err(format!("Unknown option: {arg}")),
            }
            i += 1;
        }

        Ok(SimConfig {
            signal,
            window_order,
            size,
            align,
            grid,
            seed,
            output_prefix,
            plot,
        })
    }
}

fn print_help(program: &str) {
    eprintln!("QAM Minimum-Phase Dataset Generator");
    eprintln!();
    eprintln!("Usage: {program} [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -M, --order <M>       QAM modulation order (default: 64)");
    eprintln!("  -b, --baud <Hz>       Symbol rate in Hz (default: 40e9)");
    eprintln!("  -p, --sps <n>         Samples per symbol (default: 4)");
    eprintln!("  -s, --snr <dB>        Signal-to-noise ratio in dB (default: 40)");
    eprintln!("  -r, --rolloff <a>     Pulse-shaping roll-off factor (default: 0.01)");
    eprintln!("  -w, --window <n>      Amplitude window order (default: 8)");
    eprintln!("  -z, --size <n>        Dataset rows (default: 60000)");
    eprintln!("  -a, --align <policy>  Target alignment: last | center | first");
    eprintln!("  -g, --grid            Build the 2-D grid (CNN) variant instead");
    eprintln!("      --seed <n>        RNG seed for reproducible runs");
    eprintln!("  -o, --output <prefix> Output file prefix (default: dataset)");
    eprintln!("      --plot            Also render constellation and spectrum plots");
    eprintln!("  -h, --help            Show this help message");
}

fn run(config: &SimConfig) -> Result<(), String> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("QAM Minimum-Phase Dataset Generator");
    println!("===================================");
    println!("Modulation:   {}-QAM", config.signal.modulation_order);
    println!("Symbol rate:  {:.3e} Hz", config.signal.symbol_rate);
    println!("Sample rate:  {:.3e} Hz", config.signal.sample_rate());
    println!("SNR:          {:.1} dB", config.signal.snr_db);
    println!("Rolloff:      {}", config.signal.rolloff);
    println!("Window order: {}", config.window_order);
    println!("Dataset size: {}", config.size);
    println!();

    println!("Step 1: Generating QAM signal...");
    let signal = generate_qam(&config.signal, &mut rng).map_err(|e| e.to_string())?;
    println!("  ✓ {} modes x {} samples", signal.num_modes(), signal.len());

    println!("Step 2: Simulating transmission...");
    let noisy =
        simulate_transmission(&signal, config.signal.snr_db, &mut rng).map_err(|e| e.to_string())?;
    println!("  ✓ AWGN at {:.1} dB SNR", config.signal.snr_db);

    println!("Step 3: Lowpass filtering...");
    let filtered =
        lowpass_filter(&noisy, LOWPASS_EXCESS_BW, LOWPASS_TAPS).map_err(|e| e.to_string())?;
    let filtered = normalize_and_center(&filtered).map_err(|e| e.to_string())?;
    println!("  ✓ RRC lowpass ({LOWPASS_TAPS} taps), normalised and centred");

    if config.plot {
        println!("Step 3b: Rendering plots...");
        plot_constellation(&filtered, &format!("{}_constellation.png", config.output_prefix))
            .map_err(|e| e.to_string())?;
        plot_spectrum(&filtered, &format!("{}_spectrum.png", config.output_prefix))
            .map_err(|e| e.to_string())?;
        println!("  ✓ Wrote constellation and spectrum plots");
    }

    println!("Step 4: Minimum-phase transform...");
    let (sfm, carrier) = to_minimum_phase(&filtered).map_err(|e| e.to_string())?;
    println!("  ✓ Carrier offset |A| = {:.6}", carrier.a.norm());

    println!("Step 5: Building datasets...");
    for (mode, role) in [(0usize, "train"), (1, "test")] {
        let pair = split_mode(&sfm, mode).map_err(|e| e.to_string())?;
        let path = format!("{}_{role}.csv", config.output_prefix);

        if config.grid {
            let ds = dataset::sliding_window_grid(&pair, config.window_order, config.size)
                .map_err(|e| e.to_string())?;
            write_grid_dataset_csv(&path, &ds).map_err(|e| e.to_string())?;
        } else {
            let ds =
                dataset::sliding_window(&pair, config.window_order, config.size, config.align)
                    .map_err(|e| e.to_string())?;
            write_dataset_csv(&path, &ds).map_err(|e| e.to_string())?;
        }
        println!("  ✓ {role}: {} rows -> {path}", config.size);
    }

    println!();
    println!("✓ Done");
    Ok(())
}

fn main() {
    init_tracing();

    let config = match SimConfig::parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_help("qamsim");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
