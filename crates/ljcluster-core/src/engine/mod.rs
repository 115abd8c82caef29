//! # Engine Module
//!
//! The stateful layer that advances a two-cluster system in time.
//!
//! ## Overview
//!
//! A [`simulation::Simulation`] owns the particle list and drives every step in a
//! fixed order: force evaluation, velocity correction factor, integration and
//! energy bookkeeping. Front ends observe the run through a
//! [`observer::PositionObserver`] and a [`progress::ProgressReporter`]; the engine
//! itself never touches a display.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated run parameters and their builder
//! - **Integration** ([`integrator`]) - The position and velocity update rule
//! - **Energy Feedback** ([`thermostat`]) - Velocity rescaling anchored at `E₀`
//! - **Driver** ([`simulation`]) - Lifecycle, stepping and diagnostics
//! - **State Tracking** ([`state`]) - Run phase and per-step energy records
//! - **Progress Monitoring** ([`progress`], [`observer`]) - Hooks for front ends
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod config;
pub mod error;
pub mod integrator;
pub mod observer;
pub mod progress;
pub mod simulation;
pub mod state;
pub mod thermostat;
