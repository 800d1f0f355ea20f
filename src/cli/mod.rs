//! CLI module for carequeue
//!
//! Provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schemas::{PaymentMethod, Stage};

/// carequeue - Move patient visits through the clinic's department queues
#[derive(Parser, Debug)]
#[command(name = "carequeue")]
#[command(version)]
#[command(about = "Move patient visits through the clinic's department queues")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the carequeue home directory (config and session)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Staff email
        email: String,

        /// Password (falls back to CAREQUEUE_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Print the stage table and allowed transitions
    Stages,

    /// List the visits waiting at a stage
    Queue {
        /// Stage to list (defaults to your role's queue)
        #[arg(long)]
        stage: Option<Stage>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Keep polling until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// Show a visit
    Show {
        /// Visit ID
        visit: String,
    },

    /// List the stages a visit can be handed off to
    Transitions {
        /// Visit ID
        visit: String,
    },

    /// Register a new visit at the front desk
    Register {
        /// Patient ID
        patient: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Clock in to a visit's current stage
    ClockIn {
        /// Visit ID
        visit: String,
    },

    /// Hand a visit off to another stage
    Handoff {
        /// Visit ID
        visit: String,

        /// Destination stage (required when more than one is possible)
        #[arg(long)]
        to: Option<Stage>,

        /// Receiving staff ID (required for nurse, lab and pharmacy)
        #[arg(long)]
        staff: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// What the receiving department should do next
        #[arg(long)]
        next_action: Option<String>,
    },

    /// Close a visit that has returned to the front desk
    Complete {
        /// Visit ID
        visit: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Reassign a visit within its current stage
    Reassign {
        /// Visit ID
        visit: String,

        /// New staff ID
        #[arg(long)]
        staff: String,
    },

    /// Record department data on a visit
    Record {
        #[command(subcommand)]
        record: RecordCommand,
    },

    /// Record a payment against a visit's invoice
    Pay {
        /// Visit ID
        visit: String,

        /// Amount paid
        amount: f64,

        /// cash, card, transfer or insurance
        #[arg(long, default_value = "cash")]
        method: PaymentMethod,

        /// Receipt or transaction reference
        #[arg(long)]
        reference: Option<String>,
    },

    /// List staff who can receive visits at a stage
    Staff {
        /// Stage (nurse, doctor, lab, pharmacy)
        stage: Stage,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    /// Nurse triage vitals
    Vitals {
        /// Visit ID
        visit: String,

        /// Blood pressure, e.g. 120/80
        #[arg(long)]
        bp: Option<String>,

        /// Temperature in °C
        #[arg(long)]
        temperature: Option<f64>,

        #[arg(long)]
        pulse: Option<u32>,

        #[arg(long)]
        respiratory_rate: Option<u32>,

        #[arg(long)]
        spo2: Option<u32>,

        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Height in cm
        #[arg(long)]
        height: Option<f64>,
    },

    /// Doctor's diagnosis, prescriptions and lab orders
    Diagnosis {
        /// Visit ID
        visit: String,

        diagnosis: String,

        /// drug:dosage[:frequency[:duration]], repeatable
        #[arg(long = "prescription")]
        prescriptions: Vec<String>,

        /// Test name, optionally suffixed with !urgent or !stat; repeatable
        #[arg(long = "lab-order")]
        lab_orders: Vec<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Lab results
    Lab {
        /// Visit ID
        visit: String,

        /// test=value[ unit], repeatable
        #[arg(long = "result", required = true)]
        results: Vec<String>,
    },

    /// Pharmacy dispensing
    Dispense {
        /// Visit ID
        visit: String,

        /// drug:quantity, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
}
