//! dvds embed - Inspect the embedding provider
//!
//! Utility command for checking the configured backend: dimensionality,
//! vector statistics and similarity between two texts.

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::search::cosine_similarity;
use crate::search::similarity::l2_norm;

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Text to embed
    pub text: String,

    /// Show full embedding vector (default: summary only)
    #[arg(long)]
    pub full: bool,

    /// Compare with another text (show similarity)
    #[arg(long, short)]
    pub compare: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct VectorStats {
    min: f32,
    max: f32,
    mean: f32,
    l2_norm: f32,
    non_zero: usize,
}

fn vector_stats(vector: &[f32]) -> VectorStats {
    let (min, max, sum) = vector
        .iter()
        .fold((f32::MAX, f32::MIN, 0.0f32), |acc, &x| {
            (acc.0.min(x), acc.1.max(x), acc.2 + x)
        });
    let mean = if vector.is_empty() {
        0.0
    } else {
        sum / vector.len() as f32
    };
    VectorStats {
        min,
        max,
        mean,
        l2_norm: l2_norm(vector),
        non_zero: vector.iter().filter(|x| x.abs() > 1e-10).count(),
    }
}

pub fn run(ctx: &AppContext, args: &EmbedArgs) -> Result<()> {
    let embedder = ctx.engine.embedder();
    let embedding = embedder.embed(&args.text)?;
    let stats = vector_stats(&embedding);

    let comparison = match &args.compare {
        Some(other) => {
            let other_embedding = embedder.embed(other)?;
            Some((other, cosine_similarity(&embedding, &other_embedding)?))
        }
        None => None,
    };

    if ctx.robot_mode {
        let mut output = serde_json::json!({
            "status": "ok",
            "backend": embedder.name(),
            "dimensions": embedder.dims(),
            "input": args.text,
            "stats": {
                "min": stats.min,
                "max": stats.max,
                "mean": stats.mean,
                "l2_norm": stats.l2_norm,
                "non_zero_count": stats.non_zero,
            },
        });
        if args.full {
            output["embedding"] = serde_json::json!(embedding);
        }
        if let Some((text_b, similarity)) = comparison {
            output["comparison"] = serde_json::json!({
                "text_b": text_b,
                "cosine_similarity": similarity,
            });
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Embedding Provider".bold());
    println!("  Backend: {}", embedder.name().cyan());
    println!("  Dimensions: {}", embedder.dims().to_string().cyan());
    println!();

    println!("{}", "Embedding Result".bold());
    println!("  Min: {:.6}", stats.min);
    println!("  Max: {:.6}", stats.max);
    println!("  Mean: {:.6}", stats.mean);
    println!("  L2 Norm: {:.6}", stats.l2_norm);
    println!("  Non-zero: {} of {}", stats.non_zero, embedding.len());

    if args.full {
        println!();
        for (i, v) in embedding.iter().enumerate() {
            if i > 0 && i % 8 == 0 {
                println!();
            }
            print!("{v:8.5} ");
        }
        println!();
    }

    if let Some((text_b, similarity)) = comparison {
        let shown = format!("{similarity:.4}");
        let shown = if similarity > 0.8 {
            shown.green()
        } else if similarity > 0.5 {
            shown.yellow()
        } else {
            shown.red()
        };
        println!();
        println!("{}", "Similarity Comparison".bold());
        println!("  Text B: \"{}\"", text_b.green());
        println!("  Cosine Similarity: {shown}");
    }

    Ok(())
}
