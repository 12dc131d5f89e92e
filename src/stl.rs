//! STL parsing for both the binary and the ASCII flavour of the format
use crate::surface::{SimpleMesh, Triangle};
use nalgebra::Vector3;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

/// Bytes per binary facet record: normal, three vertices, attribute count
const BINARY_FACET_LEN: usize = 50;
/// Binary header plus the facet count field
const BINARY_PREAMBLE_LEN: usize = 84;

#[derive(Debug, Error, PartialEq)]
pub enum StlError {
    #[error("file too small to be a binary STL")]
    TooShort,
    #[error("binary STL ends before the declared facet count")]
    Truncated,
    #[error("ASCII STL syntax error near `{0}`")]
    Syntax(String),
}

/// Parse an STL file, probing for the ASCII flavour first.
/// Binary files are allowed to start with `solid` in their header, so an
/// ASCII parse failure falls through to the binary decoder.
pub fn parse_stl(data: &[u8]) -> Result<SimpleMesh, StlError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }
    parse_binary_stl(data)
}

/// Decode the little-endian binary flavour
pub fn parse_binary_stl(data: &[u8]) -> Result<SimpleMesh, StlError> {
    if data.len() < BINARY_PREAMBLE_LEN {
        return Err(StlError::TooShort);
    }
    let facet_count =
        u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;

    let mut records = data[BINARY_PREAMBLE_LEN..].chunks_exact(BINARY_FACET_LEN);
    let mut triangles = Vec::with_capacity(facet_count);
    for _ in 0..facet_count {
        let record = records.next().ok_or(StlError::Truncated)?;
        let normal = le_vector3(record, 0);
        let v1 = le_vector3(record, 12);
        let v2 = le_vector3(record, 24);
        let v3 = le_vector3(record, 36);
        triangles.push(facet_triangle(v1, v2, v3, normal));
    }
    Ok(SimpleMesh::new(triangles))
}

/// Parse the ASCII flavour
pub fn parse_ascii_stl(input: &str) -> Result<SimpleMesh, StlError> {
    match ascii_stl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(StlError::Syntax(syntax_context(input, e))),
    }
}

fn ascii_stl(input: &str) -> IResult<&str, SimpleMesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // The solid name is free text up to the end of the line
    let (input, _) = not_line_ending(input)?;
    let (input, triangles) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, SimpleMesh::new(triangles)))
}

fn facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = vertex(input)?;
    let (input, v2) = vertex(input)?;
    let (input, v3) = vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, facet_triangle(v1, v2, v3, normal)))
}

fn vertex(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    vector3(input)
}

fn vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Facet with its stored normal brought to unit length.
/// Exporters routinely write zero normals, in which case the normal is
/// recomputed from the vertex winding.
fn facet_triangle(
    v1: Vector3<f32>,
    v2: Vector3<f32>,
    v3: Vector3<f32>,
    normal: Vector3<f32>,
) -> Triangle {
    match normal.try_normalize(f32::EPSILON) {
        Some(unit) => Triangle::new(v1, v2, v3, unit),
        None => Triangle::from_vertices(v1, v2, v3),
    }
}

fn le_vector3(record: &[u8], offset: usize) -> Vector3<f32> {
    let le_f32 = |i: usize| {
        f32::from_le_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]])
    };
    Vector3::new(le_f32(offset), le_f32(offset + 4), le_f32(offset + 8))
}

/// A short snippet of the unconsumed input for the error message
fn syntax_context(input: &str, error: nom::Err<nom::error::Error<&str>>) -> String {
    let remaining = match &error {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => input,
    };
    remaining.trim_start().chars().take(32).collect()
}
