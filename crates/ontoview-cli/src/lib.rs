//! CLI logic for the Ontoview diagram tool.
//!
//! Reads a parsed Tonto AST (JSON), runs the graph transform and the
//! estimate layout pass, and writes the positioned diagram graph as JSON.

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use ontoview::{DiagramTransformer, OntoviewError, ast::SourceFile};

/// Run the Ontoview CLI application
///
/// This function processes the input AST file through the transform and
/// layout pipeline and writes the resulting diagram graph to the output
/// file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `OntoviewError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - AST deserialization errors
pub fn run(args: &Args) -> Result<(), OntoviewError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let options = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let file: SourceFile = serde_json::from_str(&source)?;

    let transformer = DiagramTransformer::new(options);
    let mut graph = transformer.transform_source(&file);

    // One-shot invocation: run the estimate pass so the output has geometry.
    let mut session = transformer.session();
    session.submit(1, &mut graph);

    let json = serde_json::to_string_pretty(&graph)?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Diagram graph exported successfully");

    Ok(())
}
