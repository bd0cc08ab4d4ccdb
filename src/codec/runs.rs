//! Run-length coding of the world tile stream.
//!
//! The save format stores every tile of the world in one row-major stream of
//! `[id, count, id, count, ...]` pairs. [`encode`] and [`decode`] work on
//! typed runs; [`flatten`] and [`decode_wire`] convert to and from the flat
//! interleaved wire array.

use serde_json::Value;

use super::CodecError;
use crate::world::tile::TileType;

/// `count` consecutive repetitions of `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<T> {
    pub value: T,
    pub count: u32,
}

impl<T> Run<T> {
    pub fn new(value: T, count: u32) -> Self {
        Self { value, count }
    }
}

/// Merge maximal runs of equal consecutive values.
///
/// Adjacent output runs never share a value and every count is positive.
pub fn encode<T: Copy + PartialEq>(values: &[T]) -> Result<Vec<Run<T>>, CodecError> {
    let (&first, rest) = values.split_first().ok_or(CodecError::EmptyInput)?;

    let mut runs = Vec::new();
    let mut current = Run::new(first, 1);
    for &value in rest {
        if value == current.value && current.count < u32::MAX {
            current.count += 1;
        } else {
            runs.push(current);
            current = Run::new(value, 1);
        }
    }
    runs.push(current);
    Ok(runs)
}

/// Expand runs back into the sequence they describe.
pub fn decode<T: Copy>(runs: &[Run<T>]) -> Result<Vec<T>, CodecError> {
    let total = expanded_len(runs)
        .ok_or_else(|| CodecError::MalformedRun("run counts overflow".to_string()))?;
    let mut values = Vec::with_capacity(total);
    for (i, run) in runs.iter().enumerate() {
        if run.count == 0 {
            return Err(CodecError::MalformedRun(format!("run {i} has a zero count")));
        }
        values.extend(std::iter::repeat_n(run.value, run.count as usize));
    }
    Ok(values)
}

/// Number of values `runs` expands to, or `None` if that overflows.
pub fn expanded_len<T>(runs: &[Run<T>]) -> Option<usize> {
    runs.iter()
        .try_fold(0usize, |total, run| total.checked_add(run.count as usize))
}

/// Interleave runs into the `[id, count, ...]` wire array.
pub fn flatten(runs: &[Run<TileType>]) -> Vec<Value> {
    runs.iter()
        .flat_map(|run| [Value::from(run.value.code()), Value::from(run.count)])
        .collect()
}

/// Parse the flat wire array into runs, rejecting odd lengths, non-positive
/// counts, and tile codes outside the known set.
pub fn parse_wire(values: &[Value]) -> Result<Vec<Run<TileType>>, CodecError> {
    if values.len() % 2 != 0 {
        return Err(CodecError::MalformedRun(format!(
            "stream has odd length {}",
            values.len()
        )));
    }

    values
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let code = pair[0].as_i64().ok_or_else(|| {
                CodecError::MalformedRun(format!("run {i}: tile id {} is not an integer", pair[0]))
            })?;
            let count = pair[1].as_i64().ok_or_else(|| {
                CodecError::MalformedRun(format!("run {i}: count {} is not an integer", pair[1]))
            })?;
            if count <= 0 {
                return Err(CodecError::MalformedRun(format!(
                    "run {i}: count {count} is not positive"
                )));
            }
            let count = u32::try_from(count).map_err(|_| {
                CodecError::MalformedRun(format!("run {i}: count {count} is too large"))
            })?;
            Ok(Run::new(TileType::from_code(code)?, count))
        })
        .collect()
}

/// Decode the flat wire array straight into a tile sequence of exactly
/// `expected` tiles. The length is checked before anything is expanded.
pub fn decode_wire(values: &[Value], expected: usize) -> Result<Vec<TileType>, CodecError> {
    let runs = parse_wire(values)?;
    let mut total = 0usize;
    for run in &runs {
        total = total
            .checked_add(run.count as usize)
            .filter(|&t| t <= expected)
            .ok_or_else(|| {
                CodecError::Consistency(format!(
                    "tile stream expands past the {expected} tiles of the world"
                ))
            })?;
    }
    if total != expected {
        return Err(CodecError::Consistency(format!(
            "tile stream expands to {total} tiles, the world has {expected}"
        )));
    }
    decode(&runs)
}
