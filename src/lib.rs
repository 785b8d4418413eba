//! Compiler from variable-BF to plain brainfuck.
//!
//! In variable-BF any character that is not one of the eight instructions
//! (and not whitespace) names a tape cell. Compiling replaces each such
//! reference with the pointer moves needed to reach its cell, choosing the
//! cell assignment that makes the output as short as possible by trying
//! every one of them.
//!
//! ```
//! let reqs = vbf::parse_requirements("a:0").unwrap();
//! let (program, map) = vbf::compile("#c\na+b", &reqs).unwrap();
//! assert_eq!(program, "#vbf[{'a': 0, 'b': 1}]\n#c\n+>");
//! assert_eq!(map.get('b'), Some(1));
//! ```

pub mod assignment;
pub mod codegen;
pub mod errors;
pub mod extract;
pub mod requirements;
pub mod scanner;
pub mod search;
pub mod tape;

pub use assignment::{Template, VariableMap};
pub use errors::{CompileError, CompileResult, RequirementError};
pub use requirements::{parse_requirements, MappingRequirement};
pub use search::{SearchOptions, SearchResult};

use extract::program_variables;

/// Compiles `source`, keeping every required variable at its location.
///
/// Requirement errors are reported before any search work is done.
pub fn compile_with(
    source: &str,
    requirements: &MappingRequirement,
    options: &SearchOptions,
) -> CompileResult<SearchResult> {
    let variables = program_variables(source);
    if options.verbose {
        eprintln!("vars = {:?}", variables);
    }
    let template = Template::resolve(&variables, requirements)?;
    search::search(source, &template, options)
}

/// Compiles with the default (exhaustive, sequential) search and returns
/// the shortest program with the assignment that produced it.
pub fn compile(
    source: &str,
    requirements: &MappingRequirement,
) -> CompileResult<(String, VariableMap)> {
    let result = compile_with(source, requirements, &SearchOptions::default())?;
    Ok((result.program, result.map))
}
