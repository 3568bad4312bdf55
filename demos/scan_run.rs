//! Print a summary of an analysis directory.
//!
//! ```sh
//! cargo run --example scan_run -- /runs/180329_K00311_0045_ABCDEFGHXX_analysis
//! ```

use fastq_dirs::AnalysisDir;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let dirn = std::env::args()
        .nth(1)
        .ok_or("usage: scan_run <analysis-dir>")?;
    let analysis = AnalysisDir::new(&dirn)?;

    println!("Run: {}", analysis.run_name());
    println!("Paired-end: {}", if analysis.paired_end() { "yes" } else { "no" });
    println!(
        "Sequencing data: {} director{}",
        analysis.n_sequencing_data(),
        if analysis.n_sequencing_data() == 1 { "y" } else { "ies" }
    );
    println!("Projects: {}", analysis.n_projects());
    for project in analysis.projects() {
        println!("  {}: {}", project.name(), project.sample_summary());
        for failure in project.classification_failures() {
            println!("    warning: {failure}");
        }
    }
    if let Some(undetermined) = analysis.undetermined() {
        println!("Undetermined: {}", undetermined.sample_summary());
    }
    Ok(())
}
