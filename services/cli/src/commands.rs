use crate::render::{render_allocation, render_check, render_shortlist, AllocationReport};
use chrono::Utc;
use clap::Args;
use matched::allocation::{
    validate_choices, AllocationError, AllocationPipeline, AllocationSummary, Capacities,
    ProjectCode, TieBreak,
};
use matched::config::AppConfig;
use matched::error::AppError;
use matched::import;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Choices CSV (username, code, choice, mean, optional course)
    #[arg(long)]
    pub(crate) choices: PathBuf,
    /// Capacities CSV (project code, capacity)
    #[arg(long)]
    pub(crate) capacities: PathBuf,
    /// Optional eligibility CSV with one boolean column per course
    #[arg(long)]
    pub(crate) eligibility: Option<PathBuf>,
    /// Optional roster CSV (username, course) supplying student courses
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Override the configured tie-break policy
    #[arg(long, value_parser = parse_tie_break)]
    pub(crate) tie_break: Option<TieBreak>,
    /// Write the allocation as CSV to this path
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    /// Print JSON instead of the text table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShortlistArgs {
    /// Choices CSV (username, code, choice, mean, optional course)
    #[arg(long)]
    pub(crate) choices: PathBuf,
    /// Project code to list candidates for
    #[arg(long)]
    pub(crate) project: String,
    /// Capacities CSV; choices for unlisted projects are dropped first
    #[arg(long)]
    pub(crate) capacities: PathBuf,
    /// Optional eligibility CSV with one boolean column per course
    #[arg(long)]
    pub(crate) eligibility: Option<PathBuf>,
    /// Optional roster CSV (username, course) supplying student courses
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Override the configured tie-break policy
    #[arg(long, value_parser = parse_tie_break)]
    pub(crate) tie_break: Option<TieBreak>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Choices CSV (username, code, choice, mean, optional course)
    #[arg(long)]
    pub(crate) choices: PathBuf,
    /// Capacities CSV (project code, capacity)
    #[arg(long)]
    pub(crate) capacities: PathBuf,
    /// Optional eligibility CSV with one boolean column per course
    #[arg(long)]
    pub(crate) eligibility: Option<PathBuf>,
    /// Optional roster CSV (username, course) supplying student courses
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) fn run_allocate(args: AllocateArgs, config: &AppConfig) -> Result<(), AppError> {
    let AllocateArgs {
        choices,
        capacities,
        eligibility,
        roster,
        tie_break,
        out,
        json,
    } = args;

    let raw = import::load_choices(&choices)?;
    let capacities = import::load_capacities(&capacities)?;
    let tie_break = tie_break.unwrap_or(config.allocation.tie_break);
    let pipeline = build_pipeline(capacities, eligibility, roster)?.with_tie_break(tie_break);

    let outcome = pipeline.run(&raw)?;
    let summary = AllocationSummary::build(&outcome.allocation, pipeline.capacities(), Utc::now());

    if let Some(path) = out {
        import::save_allocation(&path, &outcome.allocation)?;
        info!(path = %path.display(), "allocation written");
    }

    let report = AllocationReport {
        tie_break,
        summary: &summary,
        allocation: &outcome.allocation,
    };
    if json {
        let body = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{body}");
    } else {
        render_allocation(&report);
    }

    Ok(())
}

pub(crate) fn run_shortlist(args: ShortlistArgs, config: &AppConfig) -> Result<(), AppError> {
    let ShortlistArgs {
        choices,
        project,
        capacities,
        eligibility,
        roster,
        tie_break,
    } = args;

    let raw = import::load_choices(&choices)?;
    let capacities = import::load_capacities(&capacities)?;
    let tie_break = tie_break.unwrap_or(config.allocation.tie_break);
    let pipeline = build_pipeline(capacities, eligibility, roster)?.with_tie_break(tie_break);

    let project = ProjectCode::from(project);
    let candidates = pipeline.shortlist(&raw, &project)?;
    render_shortlist(&project, &candidates);

    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        choices,
        capacities,
        eligibility,
        roster,
    } = args;

    let raw = import::load_choices(&choices)?;
    let capacities = import::load_capacities(&capacities)?;
    let pipeline = build_pipeline(capacities, eligibility, roster)?;

    let cleaned = pipeline.clean(&raw)?;
    validate_choices(&cleaned, pipeline.capacities()).map_err(AllocationError::from)?;
    render_check(raw.len(), cleaned.len(), pipeline.capacities().len());

    Ok(())
}

fn build_pipeline(
    capacities: Capacities,
    eligibility: Option<PathBuf>,
    roster: Option<PathBuf>,
) -> Result<AllocationPipeline, AppError> {
    let mut pipeline = AllocationPipeline::new(capacities);
    if let Some(path) = eligibility {
        pipeline = pipeline.with_eligibility(import::load_eligibility(&path)?);
    }
    if let Some(path) = roster {
        pipeline = pipeline.with_roster(import::load_roster(&path)?);
    }
    Ok(pipeline)
}

fn parse_tie_break(value: &str) -> Result<TieBreak, String> {
    TieBreak::parse(value)
        .ok_or_else(|| format!("unknown tie-break '{value}'; use input-order or student-id"))
}
