/*
MIT License with postqe Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: postqe
Copyright (c) 2016-2017 Quantum ESPRESSO Foundation and SISSA (Scuola Internazionale Superiore di Studi Avanzati).
All rights reserved.
*/

//! Command Line Interface (CLI) module
//!
//! Subcommands:
//! - `info`: summary of a charge file
//! - `charge`: real-space density as text
//! - `potential`: one potential as text

use crate::charge::{Charge, Potential, Writable};
use crate::context::StructureContext;
use crate::grid::{compute_g_squared, count_within_cutoff, Mesh};
use crate::io::{read_charge_file, read_charge_file_as, write_field_file, ChargeFileData, ChargeFormat};
use crate::potential::{PotentialKernels, PotentialKind};
use crate::utils::constants::G2_SENTINEL;
use crate::utils::{bohr_to_angstrom, rydberg_to_ev};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Post-processing of plane-wave charge densities
#[derive(Debug, Parser)]
#[command(name = "postqe")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize a charge file
    Info(InfoArgs),
    /// Write the real-space charge density
    Charge(ChargeArgs),
    /// Compute a potential and write it
    Potential(PotentialArgs),
}

/// Options shared by every subcommand that reads a charge file
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Charge-density file
    pub file: PathBuf,

    /// File encoding (flat or hdf5); guessed from the extension by default
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Structure context as JSON, adds cell and cutoff details
    #[arg(long, value_name = "json")]
    pub context: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ChargeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Real-space mesh; the smallest mesh holding every frequency by default
    #[arg(long, num_args = 3, value_names = ["NR1", "NR2", "NR3"])]
    pub nr: Option<Vec<usize>>,

    /// Output text file
    #[arg(short, long, default_value = "charge.dat")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct PotentialArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Structure context as JSON
    #[arg(long, value_name = "json")]
    pub context: Option<PathBuf>,

    #[arg(long, num_args = 3, value_names = ["NR1", "NR2", "NR3"])]
    pub nr: Option<Vec<usize>>,

    /// v_bare, v_h, v_xc or v_tot
    #[arg(short, long, default_value = "v_tot")]
    pub kind: String,

    #[arg(short, long, default_value = "potential.dat")]
    pub output: PathBuf,

    /// Write the potential in eV instead of Rydberg
    #[arg(long)]
    pub ev: bool,
}

/// Run the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Info(args) => info_command(&args),
        Command::Charge(args) => charge_command(&args),
        Command::Potential(args) => potential_command(&args),
    }
}

fn read_input(input: &InputArgs) -> Result<ChargeFileData> {
    let data = match &input.format {
        Some(format) => read_charge_file_as(&input.file, ChargeFormat::from_string(format)?),
        None => read_charge_file(&input.file),
    };
    data.with_context(|| format!("failed to read charge file {}", input.file.display()))
}

fn load_context(path: &Path) -> Result<Arc<StructureContext>> {
    let context = StructureContext::from_json_file(path)
        .with_context(|| format!("failed to load structure context {}", path.display()))?;
    Ok(Arc::new(context))
}

fn mesh_from_args(nr: Option<&[usize]>, data: &ChargeFileData) -> Result<Mesh> {
    match nr {
        None => Ok(data.min_mesh),
        Some([nr1, nr2, nr3]) => Ok(Mesh::new(*nr1, *nr2, *nr3)?),
        Some(other) => bail!("--nr needs three values, got {}", other.len()),
    }
}

fn info_command(args: &InfoArgs) -> Result<()> {
    let data = read_input(&args.input)?;
    println!("file        : {}", args.input.file.display());
    println!("gamma only  : {}", data.gamma_only);
    println!("ngm         : {}", data.ngm);
    println!("nspin       : {}", data.nspin);
    let fields: Vec<String> = data.grid.field_kinds().map(|k| k.to_string()).collect();
    println!("fields      : {}", fields.join(", "));
    println!("minimal mesh: {}", data.min_mesh);
    for (i, b) in data.basis.reciprocal().iter().enumerate() {
        println!("b{}          : {}", i + 1, b);
    }

    if let Some(path) = &args.context {
        let context = load_context(path)?;
        let basis = context.reciprocal_basis()?;
        let g_squared = compute_g_squared(
            &basis,
            data.min_mesh,
            context.ecutrho,
            context.alat,
            G2_SENTINEL,
        );
        println!(
            "alat        : {:.6} bohr ({:.6} Å)",
            context.alat,
            bohr_to_angstrom(context.alat)
        );
        println!("volume      : {:.6} bohr^3", context.cell_volume());
        println!("ecutrho     : {} Ry", context.ecutrho);
        println!(
            "G in cutoff : {} of {}",
            count_within_cutoff(&g_squared, G2_SENTINEL),
            data.min_mesh.len()
        );
    }
    Ok(())
}

fn charge_command(args: &ChargeArgs) -> Result<()> {
    let data = read_input(&args.input)?;
    let mesh = mesh_from_args(args.nr.as_deref(), &data)?;

    let mut charge = Charge::new(mesh);
    charge.load(&data)?;

    charge
        .write(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn potential_command(args: &PotentialArgs) -> Result<()> {
    let kind = PotentialKind::from_string(&args.kind)?;
    let Some(context_path) = &args.context else {
        bail!("computing {} needs a structure context (--context)", kind);
    };
    let context = load_context(context_path)?;

    let data = read_input(&args.input)?;
    let mesh = mesh_from_args(args.nr.as_deref(), &data)?;
    let mut charge = Charge::new(mesh).with_context(context);
    charge.load(&data)?;

    let mut potential = Potential::new(charge, kind, Arc::new(PotentialKernels::default()));
    if args.ev {
        let header = potential.header();
        let values = potential.values()?.mapv(rydberg_to_ev);
        write_field_file(&args.output, &values, &header)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!("{} written to {} in eV", kind, args.output.display());
    } else {
        potential
            .write(&args.output)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
    }
    Ok(())
}
