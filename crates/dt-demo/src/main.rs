//! Demo driver for `dt-tensor`.
//!
//!   dt-demo
//!   dt-demo --rows 1 --cols 3 --values 200,-300,1.5 --scale 1.0 --half

use std::fmt::Write;

use anyhow::{bail, Result};
use clap::Parser;

use dt_tensor::{dequantize, encode_tensor_f16, quantize, DType, MemoryUsage, Tensor};

#[derive(Parser, Debug)]
#[command(name = "dt-demo")]
#[command(about = "Quantize a float32 tensor to int8 and back, printing each stage")]
#[command(version)]
struct Args {
    /// Number of rows
    #[arg(long, default_value_t = 2)]
    rows: u16,

    /// Number of columns
    #[arg(long, default_value_t = 2)]
    cols: u16,

    /// Quantization step between one int8 unit and one float unit
    #[arg(long, default_value_t = 0.1, allow_hyphen_values = true)]
    scale: f32,

    /// Row-major input values, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_values_t = vec![0.5, -1.2, 3.4, 2.1]
    )]
    values: Vec<f32>,

    /// Also show the input stored as float16
    #[arg(long)]
    half: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Build the full demo report.
fn run(args: &Args) -> Result<String> {
    let numel = u32::from(args.rows) * u32::from(args.cols);
    if args.values.len() != numel as usize {
        bail!(
            "expected {} values for a {}x{} tensor, got {}",
            numel,
            args.rows,
            args.cols,
            args.values.len()
        );
    }
    if args.scale == 0.0 || !args.scale.is_finite() {
        bail!("scale must be finite and nonzero, got {}", args.scale);
    }

    let mut out = String::new();
    writeln!(out, "=== Dynamic Tensor Demo ===\n")?;

    let input = Tensor::from_f32(args.rows, args.cols, args.values.clone())?;
    writeln!(out, "Original Float32 Tensor:")?;
    write!(out, "{}", input)?;

    log::debug!("quantizing {} elements with scale {}", numel, args.scale);
    let mut quantized = Tensor::allocate(args.rows, args.cols, DType::I8)?;
    quantize(&input, &mut quantized, args.scale);
    writeln!(out, "\nQuantized INT8 Tensor:")?;
    write!(out, "{}", quantized)?;

    let mut dequantized = Tensor::allocate(args.rows, args.cols, DType::F32)?;
    dequantize(&quantized, &mut dequantized, args.scale);
    writeln!(out, "\nDequantized Back To Float32:")?;
    write!(out, "{}", dequantized)?;

    if args.half {
        let mut half = Tensor::allocate(args.rows, args.cols, DType::F16)?;
        encode_tensor_f16(&input, &mut half);
        writeln!(out, "\nStored As Float16:")?;
        write!(out, "{}", half)?;
        half.release();
    }

    write!(out, "\n{}", MemoryUsage::for_elements(numel))?;

    input.release();
    quantized.release();
    dequantized.release();

    Ok(out)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let report = run(&args)?;
    print!("{}", report);
    Ok(())
}
