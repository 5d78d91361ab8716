use matched::allocation::{Allocation, AllocationSummary, Choice, ProjectCode, TieBreak};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct AllocationReport<'a> {
    pub(crate) tie_break: TieBreak,
    pub(crate) summary: &'a AllocationSummary,
    pub(crate) allocation: &'a Allocation,
}

pub(crate) fn render_allocation(report: &AllocationReport<'_>) {
    let summary = report.summary;

    println!(
        "Allocation generated {} (tie-break: {})",
        summary.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.tie_break
    );
    println!(
        "- {} students | {} allocated | {} unallocated | {:.0}% first choice",
        summary.students,
        summary.allocated,
        summary.unallocated,
        summary.first_choice_rate() * 100.0
    );
    if !summary.by_rank.is_empty() {
        println!("Placements by preference:");
        for (rank, count) in &summary.by_rank {
            println!("  - choice {}: {}", rank, count);
        }
    }

    println!("Projects ({} spare places):", summary.spare_places());
    for fill in &summary.projects {
        let marker = if fill.is_full() { " (full)" } else { "" };
        println!(
            "  - {}: {}/{}{}",
            fill.project_code, fill.allocated, fill.capacity, marker
        );
    }

    println!("Students:");
    for (student, placement) in report.allocation.iter() {
        match placement {
            Some(placement) => println!(
                "  - {} -> {} (choice {})",
                student, placement.project_code, placement.rank
            ),
            None => println!("  - {} -> unallocated", student),
        }
    }
}

pub(crate) fn render_shortlist(project: &ProjectCode, candidates: &[Choice]) {
    if candidates.is_empty() {
        println!("No candidates for {}", project);
        return;
    }

    println!("Shortlist for {} ({} candidates)", project, candidates.len());
    for (position, candidate) in candidates.iter().enumerate() {
        println!(
            "{:>3}. {} | score {:.1} | choice {}",
            position + 1,
            candidate.student_id,
            candidate.score,
            candidate.rank
        );
    }
}

pub(crate) fn render_check(records: usize, kept: usize, projects: usize) {
    println!("Inputs valid");
    println!(
        "- {} choice records | {} kept after cleaning | {} projects with capacity",
        records, kept, projects
    );
}
