use anyhow::Result;
use clap::Parser;
use moocgen::graph::{load_graph, USER_COURSE_RELATIONS};
use moocgen::history::load_histories;
use moocgen::reason::decide;
use moocgen::{Config, Justification};

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Report knowledge graph and learner history statistics")]
struct Args {
    /// Also compute the justification strategy distribution (scans every
    /// would-be example)
    #[arg(long)]
    strategies: bool,
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[usize], p: f64) -> usize {
    if sorted_values.is_empty() {
        return 0;
    }
    let index = ((sorted_values.len() - 1) as f64 * p).ceil() as usize;
    sorted_values[index.min(sorted_values.len() - 1)]
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = Config::load()?;

    let (graph, load_stats) = load_graph(
        config.entities_dir(),
        config.relations_dir(),
        config.dataset.desc_max_chars,
    )?;
    let enrollments = config.relations_dir().join(USER_COURSE_RELATIONS);
    let (histories, history_stats) = load_histories(&enrollments, &graph)?;

    println!("\n=== MoocGen Dataset Statistics ===\n");

    println!("Knowledge Graph:");
    println!("{:-<50}", "");
    println!("{:<35} {:>12}", "Courses", load_stats.courses);
    println!("{:<35} {:>12}", "Concepts", load_stats.concepts);
    println!("{:<35} {:>12}", "Course-concept edges", load_stats.course_concept_edges);
    println!("{:<35} {:>12}", "Prerequisite edges", load_stats.prerequisite_edges);
    println!("{:<35} {:>12}", "Skipped input lines", load_stats.skipped_lines);

    println!("\nEnrollments:");
    println!("{:-<50}", "");
    println!("{:<35} {:>12}", "Records kept", history_stats.kept);
    println!("{:<35} {:>12}", "Dropped (unknown course)", history_stats.dropped_unknown_course);
    println!("{:<35} {:>12}", "Malformed lines", history_stats.malformed_lines);
    println!("{:<35} {:>12}", "Learners", histories.len());

    let min_len = config.windowing.min_history_len;
    let eligible = histories.iter().filter(|h| h.courses.len() >= min_len).count();
    println!("{:<35} {:>12}", format!("Eligible (history >= {})", min_len), eligible);

    let mut lengths: Vec<usize> = histories.iter().map(|h| h.courses.len()).collect();
    lengths.sort_unstable();
    if !lengths.is_empty() {
        println!("\nHistory Length Percentiles:");
        println!("{:-<50}", "");
        println!("{:<35} {:>12}", "P50", percentile(&lengths, 0.50));
        println!("{:<35} {:>12}", "P95", percentile(&lengths, 0.95));
        println!("{:<35} {:>12}", "P99", percentile(&lengths, 0.99));
        println!("{:<35} {:>12}", "Max", lengths[lengths.len() - 1]);
    }

    if args.strategies {
        // Replays the builder's windowing without rendering, counting which
        // justification strategy each would-be example lands on.
        let context_len = config.windowing.context_len;
        let max_targets = config.windowing.max_targets_per_learner;
        let (mut prereq, mut continuation, mut description) = (0usize, 0usize, 0usize);

        for history in &histories {
            let n = history.courses.len();
            if n < min_len {
                continue;
            }
            let first_target = n.saturating_sub(max_targets).max(1);
            for i in first_target..n {
                let context = &history.courses[i.saturating_sub(context_len)..i];
                if context.is_empty() {
                    continue;
                }
                match decide(&graph, context, &history.courses[i])? {
                    Justification::Prerequisite { .. } => prereq += 1,
                    Justification::Continuation { .. } => continuation += 1,
                    Justification::Description { .. } => description += 1,
                }
            }
        }

        let total = prereq + continuation + description;
        println!("\nJustification Strategy Distribution ({} examples):", total);
        println!("{:-<50}", "");
        for (label, count) in [
            ("逻辑连贯 (prerequisite)", prereq),
            ("兴趣延续 (continuation)", continuation),
            ("内容推荐 (description)", description),
        ] {
            let pct = if total > 0 { count as f64 * 100.0 / total as f64 } else { 0.0 };
            println!("{:<35} {:>8} {:>6.1}%", label, count, pct);
        }
    }

    println!();

    Ok(())
}
