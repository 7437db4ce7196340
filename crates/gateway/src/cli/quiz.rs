//! `lumina quiz` — interactive quiz REPL.
//!
//! Walks the saved quiz one question at a time, updates the
//! spaced-repetition schedule after every answer, fetches an explanation
//! for wrong answers, and closes with a performance report. All mutable
//! state (score, schedule) lives here, outside the pipeline.

use std::path::PathBuf;

use chrono::Utc;
use rustyline::error::ReadlineError;

use lumina_domain::config::Config;
use lumina_domain::srs::SpacedRepetition;

const OPTION_KEYS: [char; 4] = ['a', 'b', 'c', 'd'];

pub async fn run(config: &Config, analysis_path: PathBuf) -> anyhow::Result<()> {
    let analysis = super::read_analysis(&analysis_path)?;
    if analysis.quiz.is_empty() {
        anyhow::bail!("analysis has no quiz questions");
    }

    let pipeline = super::pipeline(config)?;
    let mut srs = SpacedRepetition::initialize(analysis.quiz.len(), Utc::now());
    let mut rl = rustyline::DefaultEditor::new()?;

    eprintln!(
        "Lumina quiz — {} questions. Answer with a-d, Ctrl+D to stop early.",
        analysis.quiz.len()
    );

    let mut correct: u32 = 0;
    let mut answered: u32 = 0;

    'questions: for (idx, item) in analysis.quiz.iter().enumerate() {
        println!("\n{}. {}", idx + 1, item.question);
        for (key, option) in OPTION_KEYS.iter().zip(&item.options) {
            println!("   {key}) {option}");
        }

        let choice = loop {
            match rl.readline("answer> ") {
                Ok(line) => {
                    let line = line.trim().to_lowercase();
                    match OPTION_KEYS.iter().position(|k| line == k.to_string()) {
                        Some(pos) if pos < item.options.len() => break &item.options[pos],
                        _ => eprintln!("please answer with a, b, c, or d"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break 'questions,
                Err(e) => return Err(e.into()),
            }
        };

        answered += 1;
        let is_correct = *choice == item.answer;
        if is_correct {
            correct += 1;
            println!("correct!");
        } else {
            println!("incorrect — the answer is: {}", item.answer);
            // Best-effort, like the "Why?" button: a failed explanation
            // never aborts the quiz.
            match pipeline.explanation(&item.answer, &analysis.summary, true).await {
                Ok(text) => println!("why: {text}"),
                Err(e) => tracing::warn!(error = %e, "explanation fetch failed"),
            }
        }

        // One answer at a time; only this loop ever touches the schedule.
        let state = srs.update(idx, is_correct, Utc::now());
        println!("next review in {:.1} day(s)", state.interval_days);
    }

    if answered == 0 {
        eprintln!("no answers given");
        return Ok(());
    }

    println!("\nscore: {correct}/{}", analysis.quiz.len());
    match pipeline.performance(&analysis, correct).await {
        Ok(report) => {
            println!("accuracy: {}%", report.accuracy);
            if !report.strengths.is_empty() {
                println!("\nstrengths:");
                for item in &report.strengths {
                    println!("  + {item}");
                }
            }
            if !report.growth_areas.is_empty() {
                println!("\ngrowth areas:");
                for item in &report.growth_areas {
                    println!("  - {item}");
                }
            }
            if !report.recommendations.is_empty() {
                println!("\nrecommendations:");
                for item in &report.recommendations {
                    println!("  > {item}");
                }
            }
        }
        Err(e) => eprintln!("performance analysis failed: {e}"),
    }
    Ok(())
}
