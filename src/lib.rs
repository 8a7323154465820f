pub mod ast;
pub mod graph;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod rank;
pub mod serializer;

use wasm_bindgen::prelude::*;

use ir::{BuildError, DiagramIR};
use parser::{ParseError, Parser};
use rank::{RankEngine, Ranking};
use serializer::OutputFormat;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Build(#[from] BuildError),
}

/// Parse ERD source and rank the selected diagram.
pub fn arrange(source: &str, view: Option<&str>, engine: &RankEngine) -> Result<Ranking, Error> {
    let schema = Parser::new(source)?.parse()?;
    let ir = DiagramIR::from_schema(&schema, view)?;
    let mut graph = ir.to_graph();
    Ok(engine.rank(&mut graph))
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Rank ERD source and serialize the result
#[wasm_bindgen(js_name = "erdToArrangement")]
pub fn render_arrangement(
    source: &str,
    view: Option<String>,
    format: Option<String>,
) -> Result<String, String> {
    let format = match format.as_deref() {
        None => OutputFormat::default(),
        Some(name) => {
            OutputFormat::from_str(name).ok_or_else(|| format!("Unknown format: {}", name))?
        }
    };

    let ranking = arrange(source, view.as_deref(), &RankEngine::default()).map_err(|e| e.to_string())?;
    serializer::serialize(&ranking, format).map_err(|e| e.to_string())
}
