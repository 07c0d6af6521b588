//! The AIG (And-Inverter Graph) circuit model and its AIGER parsers.
//!
//! This is the read-only data structure the rest of the crate is built on
//! top of (see `EngineContext`): once parsed and reencoded, an [`AigModel`]
//! never changes for the lifetime of a run.
//!
//! An AIGER literal is `2*var + sign`; literal `0` is the constant `false`
//! and literal `1` is the constant `true`. Both the human-readable `aag`
//! format and the packed `aig` format are accepted, from a path or from
//! standard input.

use std::io::{self, BufRead, Read};

/// A raw AIGER literal: `2*variable + (negated as 0/1)`. Literals `0` and
/// `1` denote the boolean constants.
pub type AigLit = u32;

/// Distinguishes a malformed-file diagnostic from a well-formed-but-rejected
/// one (zero or more than one output), since the CLI reports them under
/// different message prefixes.
#[derive(Debug, thiserror::Error)]
pub enum AigError {
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Structural(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latch {
    pub lit: AigLit,
    pub next: AigLit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AndGate {
    pub lhs: AigLit,
    pub rhs0: AigLit,
    pub rhs1: AigLit,
}

/// A parsed, reencoded AIG with exactly one output.
///
/// After [`AigModel::reencode`], gate `lhs` literals are dense and
/// topologically ordered: inputs occupy variables `1..=num_inputs`, latches
/// occupy the next `num_latches` variables, and AND gates occupy the rest in
/// file order. The literal map (`crate::litmap`) depends on this.
#[derive(Debug, Clone)]
pub struct AigModel {
    pub maxvar: u32,
    pub inputs: Vec<AigLit>,
    pub latches: Vec<Latch>,
    pub ands: Vec<AndGate>,
    pub output: AigLit,
}

impl AigModel {
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_latches(&self) -> usize {
        self.latches.len()
    }

    pub fn num_ands(&self) -> usize {
        self.ands.len()
    }

    /// Parse from a byte slice, detecting `aag` (ASCII) vs `aig` (binary)
    /// from the header magic, then reencode.
    pub fn parse(bytes: &[u8]) -> Result<Self, AigError> {
        let raw = if bytes.starts_with(b"aag") {
            RawAig::parse_ascii(bytes).map_err(AigError::Parse)?
        } else if bytes.starts_with(b"aig") {
            RawAig::parse_binary(bytes).map_err(AigError::Parse)?
        } else {
            return Err(AigError::Parse(
                "not an AIGER file: missing 'aag'/'aig' magic".to_string(),
            ));
        };
        raw.validate().map_err(AigError::Structural)?;
        Ok(raw.reencode())
    }

    /// Parse from a path, or from stdin when `path` is `None`.
    pub fn parse_from(path: Option<&str>) -> Result<Self, AigError> {
        let mut buf = Vec::new();
        match path {
            Some(p) => {
                std::fs::File::open(p)
                    .and_then(|mut f| f.read_to_end(&mut buf))
                    .map_err(|e| AigError::Parse(format!("{}: {}", p, e)))?;
            }
            None => {
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .map_err(|e| AigError::Parse(e.to_string()))?;
            }
        }
        Self::parse(&buf)
    }
}

/// The model exactly as read off the wire, before variable renumbering.
struct RawAig {
    maxvar: u32,
    num_inputs: u32,
    num_latches: u32,
    num_outputs: u32,
    num_ands: u32,
    inputs: Vec<AigLit>,
    latches: Vec<Latch>,
    outputs: Vec<AigLit>,
    ands: Vec<AndGate>,
}

impl RawAig {
    fn validate(&self) -> Result<(), String> {
        if self.num_outputs == 0 {
            return Err("no output found".to_string());
        }
        if self.num_outputs > 1 {
            return Err("more than one output found".to_string());
        }
        Ok(())
    }

    /// Renumber so that inputs, then latches, then AND gates (in file
    /// order, which AIGER guarantees is topological) get dense consecutive
    /// variable numbers starting at 1.
    fn reencode(self) -> AigModel {
        let mut map = vec![0u32; self.maxvar as usize + 1];
        let mut next_var = 1u32;

        let remap_lit = |map: &[u32], l: AigLit| -> AigLit {
            let v = l >> 1;
            if v == 0 {
                l
            } else {
                (map[v as usize] << 1) | (l & 1)
            }
        };

        for &l in &self.inputs {
            let v = (l >> 1) as usize;
            map[v] = next_var;
            next_var += 1;
        }
        for latch in &self.latches {
            let v = (latch.lit >> 1) as usize;
            map[v] = next_var;
            next_var += 1;
        }
        for gate in &self.ands {
            let v = (gate.lhs >> 1) as usize;
            map[v] = next_var;
            next_var += 1;
        }

        let inputs = self.inputs.iter().map(|&l| remap_lit(&map, l)).collect();
        let latches = self
            .latches
            .iter()
            .map(|latch| Latch {
                lit: remap_lit(&map, latch.lit),
                next: remap_lit(&map, latch.next),
            })
            .collect();
        let ands = self
            .ands
            .iter()
            .map(|gate| AndGate {
                lhs: remap_lit(&map, gate.lhs),
                rhs0: remap_lit(&map, gate.rhs0),
                rhs1: remap_lit(&map, gate.rhs1),
            })
            .collect();
        let output = remap_lit(&map, self.outputs[0]);

        AigModel {
            maxvar: next_var - 1,
            inputs,
            latches,
            ands,
            output,
        }
    }

    fn parse_ascii(bytes: &[u8]) -> Result<Self, String> {
        let mut lines = bytes.lines();
        let header = lines
            .next()
            .ok_or("empty file")?
            .map_err(|e| e.to_string())?;
        let fields: Vec<u32> = header
            .split_whitespace()
            .skip(1)
            .map(|s| s.parse::<u32>().map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?;
        let [maxvar, num_inputs, num_latches, num_outputs, num_ands] = fields
            .as_slice()
            .try_into()
            .map_err(|_| "malformed aag header".to_string())?;

        let parse_lit = |s: &str| -> Result<AigLit, String> {
            s.parse::<AigLit>().map_err(|e| e.to_string())
        };

        let mut inputs = Vec::with_capacity(num_inputs as usize);
        for _ in 0..num_inputs {
            let line = lines.next().ok_or("truncated input section")?.map_err(|e| e.to_string())?;
            inputs.push(parse_lit(line.trim())?);
        }

        let mut latches = Vec::with_capacity(num_latches as usize);
        for _ in 0..num_latches {
            let line = lines.next().ok_or("truncated latch section")?.map_err(|e| e.to_string())?;
            let mut parts = line.split_whitespace();
            let lit = parse_lit(parts.next().ok_or("missing latch literal")?)?;
            let next = parse_lit(parts.next().ok_or("missing latch next literal")?)?;
            latches.push(Latch { lit, next });
        }

        let mut outputs = Vec::with_capacity(num_outputs as usize);
        for _ in 0..num_outputs {
            let line = lines.next().ok_or("truncated output section")?.map_err(|e| e.to_string())?;
            outputs.push(parse_lit(line.trim())?);
        }

        let mut ands = Vec::with_capacity(num_ands as usize);
        for _ in 0..num_ands {
            let line = lines.next().ok_or("truncated and section")?.map_err(|e| e.to_string())?;
            let mut parts = line.split_whitespace();
            let lhs = parse_lit(parts.next().ok_or("missing and lhs")?)?;
            let rhs0 = parse_lit(parts.next().ok_or("missing and rhs0")?)?;
            let rhs1 = parse_lit(parts.next().ok_or("missing and rhs1")?)?;
            ands.push(AndGate { lhs, rhs0, rhs1 });
        }

        Ok(RawAig {
            maxvar,
            num_inputs,
            num_latches,
            num_outputs,
            num_ands,
            inputs,
            latches,
            outputs,
            ands,
        })
    }

    /// Binary `aig` format: ASCII header, then positional inputs/latches
    /// (only the latch `next` literal is written, delta against nothing),
    /// then delta-encoded AND gates, then ASCII outputs.
    fn parse_binary(bytes: &[u8]) -> Result<Self, String> {
        let header_end = bytes
            .iter()
            .position(|&b| b == b'\n')
            .ok_or("missing header newline")?;
        let header = std::str::from_utf8(&bytes[..header_end]).map_err(|e| e.to_string())?;
        let fields: Vec<u32> = header
            .split_whitespace()
            .skip(1)
            .map(|s| s.parse::<u32>().map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?;
        let [maxvar, num_inputs, num_latches, num_outputs, num_ands] = fields
            .as_slice()
            .try_into()
            .map_err(|_| "malformed aig header".to_string())?;

        let mut pos = header_end + 1;

        // Inputs are positional: input i has literal 2*(i+1).
        let inputs: Vec<AigLit> = (0..num_inputs).map(|i| 2 * (i + 1)).collect();

        // Latches: literal is positional (continuing after inputs); only
        // the next-state literal is stored, one per line in ASCII decimal.
        let mut latches = Vec::with_capacity(num_latches as usize);
        for i in 0..num_latches {
            let line_end = bytes[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .ok_or("truncated latch section")?;
            let line = std::str::from_utf8(&bytes[pos..pos + line_end]).map_err(|e| e.to_string())?;
            let next: AigLit = line.trim().parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
            let lit = 2 * (num_inputs + i + 1);
            latches.push(Latch { lit, next });
            pos += line_end + 1;
        }

        let mut outputs = Vec::with_capacity(num_outputs as usize);
        for _ in 0..num_outputs {
            let line_end = bytes[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .ok_or("truncated output section")?;
            let line = std::str::from_utf8(&bytes[pos..pos + line_end]).map_err(|e| e.to_string())?;
            outputs.push(line.trim().parse().map_err(|e: std::num::ParseIntError| e.to_string())?);
            pos += line_end + 1;
        }

        // AND gates: lhs is positional (continuing after inputs+latches);
        // rhs0/rhs1 are stored as two base-128 varint deltas, most
        // significant group last, from `lhs`.
        let mut ands = Vec::with_capacity(num_ands as usize);
        let mut next_lhs = 2 * (num_inputs + num_latches + 1);
        for _ in 0..num_ands {
            let (d0, consumed0) = read_varint(&bytes[pos..])?;
            pos += consumed0;
            let (d1, consumed1) = read_varint(&bytes[pos..])?;
            pos += consumed1;
            let rhs0 = next_lhs.checked_sub(d0).ok_or("malformed and delta")?;
            let rhs1 = rhs0.checked_sub(d1).ok_or("malformed and delta")?;
            ands.push(AndGate {
                lhs: next_lhs,
                rhs0,
                rhs1,
            });
            next_lhs += 2;
        }

        Ok(RawAig {
            maxvar,
            num_inputs,
            num_latches,
            num_outputs,
            num_ands,
            inputs,
            latches,
            outputs,
            ands,
        })
    }
}

/// Decode one AIGER base-128 varint (little-endian groups of 7 bits, high
/// bit marks continuation).
fn read_varint(bytes: &[u8]) -> Result<(u32, usize), String> {
    let mut result: u32 = 0;
    let mut shift = 0u32;
    for (i, &byte) in bytes.iter().enumerate() {
        result |= ((byte & 0x7f) as u32) << shift;
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
        if shift >= 32 {
            return Err("varint too long".to_string());
        }
    }
    Err("truncated varint".to_string())
}
