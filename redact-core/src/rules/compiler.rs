// redact-core/src/rules/compiler.rs
//! compiler.rs - Turns parsed instructions into evaluators.
//!
//! The compiler walks the opcode nodes and groups them into rules of the
//! shape `selector = method params?`. Method names are resolved against a
//! [`MethodRegistry`] and each factory is invoked exactly once per rule, so
//! the resulting [`Evaluator`] only holds ready-to-run transformers.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::errors::CompileError;
use crate::instruction::opcode::Node;
use crate::instruction::{parse_instruction, OpCode};
use crate::methods::MethodRegistry;

use super::args::Arg;
use super::evaluator::{Evaluator, GroupSelector, Rule};

/// Finds the next node matching `pred` at or after `from`.
///
/// The last node never matches: every segment the compiler looks for must be
/// followed by at least one more node.
fn find_next(nodes: &[Node], from: usize, pred: impl Fn(&Node) -> bool) -> Option<usize> {
    (from..nodes.len().saturating_sub(1)).find(|&i| pred(&nodes[i]))
}

fn is_group_selector(node: &Node) -> bool {
    matches!(node.op_code(), OpCode::Set | OpCode::String)
}

fn expand_selector(node: &Node) -> Result<Vec<GroupSelector>, CompileError> {
    if let Some(identifier) = node.as_str() {
        return Ok(vec![GroupSelector {
            identifier: identifier.to_lowercase(),
            inverted: node.is_inverted(),
        }]);
    }
    node.children()
        .iter()
        .map(|child| {
            let identifier = child.as_str().ok_or_else(|| {
                CompileError::InvalidChain(format!(
                    "group selector entries must be identifiers, found {}",
                    child.op_code()
                ))
            })?;
            Ok(GroupSelector {
                identifier: identifier.to_lowercase(),
                inverted: node.is_inverted() || child.is_inverted(),
            })
        })
        .collect()
}

fn to_args(children: &[Node]) -> Result<Vec<Arg>, CompileError> {
    children
        .iter()
        .map(|child| match child {
            Node::Scalar { literal, .. } => Ok(Arg::new(literal.clone())),
            other => Err(CompileError::InvalidArgument(other.op_code())),
        })
        .collect()
}

/// Compiles already parsed nodes. `instruction` is only used in diagnostics.
pub fn compile_nodes(instruction: &str, nodes: &[Node], registry: &MethodRegistry) -> Result<Evaluator, CompileError> {
    let mut rules = Vec::new();
    let mut pos = 0;

    loop {
        let Some(group_at) = find_next(nodes, pos, is_group_selector) else {
            if rules.is_empty() {
                return Err(CompileError::InvalidChain(format!(
                    "no group selector found in '{}'",
                    instruction
                )));
            }
            // Anything after the last complete rule is ignored.
            break;
        };
        let selector = &nodes[group_at];
        let groups = expand_selector(selector)?;

        let run_at = find_next(nodes, group_at, |n| matches!(n, Node::Run)).ok_or_else(|| {
            CompileError::InvalidChain(format!("group selector in '{}' is not followed by '='", instruction))
        })?;

        let method_node = &nodes[run_at + 1];
        let method = method_node.as_str().ok_or_else(|| {
            CompileError::InvalidChain(format!(
                "method name in '{}' must be a string, found {}",
                instruction,
                method_node.op_code()
            ))
        })?;
        let factory = registry
            .get(method)
            .ok_or_else(|| CompileError::UnknownTransformer(method.to_string()))?;

        pos = run_at + 2;
        let args = match nodes.get(pos) {
            Some(Node::Params { children, .. }) => {
                pos += 1;
                to_args(children)?
            }
            _ => Vec::new(),
        };

        let transformer = factory(&args).map_err(|source| CompileError::Method {
            method: method.to_string(),
            instruction: instruction.to_string(),
            source,
        })?;

        rules.push(Rule {
            groups,
            run_on_no_match: selector.is_inverted(),
            method: method.to_lowercase(),
            transformer,
        });
    }

    Ok(Evaluator::new(instruction, rules))
}

/// Parses and compiles an instruction such as `~[admin,csr]=star(-4)`.
pub fn compile_instruction(instruction: &str, registry: &MethodRegistry) -> Result<Evaluator, CompileError> {
    debug!("Compiling instruction '{}'.", instruction);
    let nodes = parse_instruction(instruction);
    let evaluator = compile_nodes(instruction, &nodes, registry)?;
    debug!(
        "Compiled instruction '{}' into {} rule(s).",
        instruction,
        evaluator.rules().len()
    );
    Ok(evaluator)
}
