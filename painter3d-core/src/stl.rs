/// STL file import (binary and ASCII) into an indexed mesh
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::map,
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16},
    sequence::{preceded, tuple},
    IResult,
};
use thiserror::Error;

use crate::color::Palette;
use crate::error::RenderError;
use crate::geometry::Mesh;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StlError {
    #[error("File too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),
    #[error("Binary STL declares {declared} triangles but only {available} fit in the file")]
    Truncated { declared: usize, available: usize },
    #[error("Failed to parse binary STL: {0}")]
    Binary(String),
    #[error("Failed to parse ASCII STL: {0}")]
    Ascii(String),
    #[error(transparent)]
    Mesh(#[from] RenderError),
}

type Triangle = [Point3<f32>; 3];

/// Build a white mesh with three fresh vertices per triangle
fn triangles_to_mesh(triangles: Vec<Triangle>) -> Result<Mesh, StlError> {
    let faces = (0..triangles.len()).map(|i| [3 * i, 3 * i + 1, 3 * i + 2]).collect();
    let vertices = triangles.into_iter().flatten().collect();
    Ok(Mesh::uniform(vertices, faces, Vec::new(), Palette::White)?)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    let declared = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[HEADER_LEN + 4..];
    let available = body.len() / RECORD_LEN;
    if declared > available {
        return Err(StlError::Truncated {
            declared,
            available,
        });
    }

    let (_, triangles) = count(binary_facet, declared)(body)
        .map_err(|e| StlError::Binary(e.to_string()))?;
    triangles_to_mesh(triangles)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    // Stored normals are ignored; nothing downstream shades
    let (input, _normal) = take(12usize)(input)?;
    let (input, a) = binary_point(input)?;
    let (input, b) = binary_point(input)?;
    let (input, c) = binary_point(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, [a, b, c]))
}

fn binary_point(input: &[u8]) -> IResult<&[u8], Point3<f32>> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| Point3::new(x, y, z))(input)
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    let (_, triangles) = ascii_solid(input).map_err(|e| StlError::Ascii(e.to_string()))?;
    triangles_to_mesh(triangles)
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    Ok((input, triangles))
}

fn ascii_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    ascii_vector(input)
}

fn ascii_vector(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Detect and parse an STL file (ASCII if it reads as one, binary otherwise)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Binary headers may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(mesh) = std::str::from_utf8(data)
            .map_err(|e| StlError::Ascii(e.to_string()))
            .and_then(parse_ascii_stl)
        {
            return Ok(mesh);
        }
    }
    parse_binary_stl(data)
}
