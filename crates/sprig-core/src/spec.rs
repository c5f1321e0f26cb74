// crates/sprig-core/src/spec.rs
use std::fmt;

/// One of the two layout axes of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Width, measured left to right
    Horizontal,
    /// Height, measured bottom to top
    Vertical,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// The letter a proportional spec on the *other* axis uses to name this one
    /// ("0.5h" on a width refers to the height, "2w" on a height to the width).
    fn proportional_suffix(self) -> char {
        match self {
            Axis::Horizontal => 'w',
            Axis::Vertical => 'h',
        }
    }
}

/// How one axis of one node is sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeMode {
    /// A fixed number of points, scaled by the point size
    FixedPoints(f32),
    /// A multiple of the node's own size on the other axis
    EqualToOtherAxis(f32),
    /// `numerator / denominator` of the space left after rigid siblings
    FixedFraction { numerator: u32, denominator: u32 },
    /// A number of claims on the space left after every other sibling
    VariableFraction { claims: u32 },
    /// Just large enough for the largest rigid child (or the label)
    Wrap,
    /// The input did not match the grammar; always resolves to zero
    Unconstrained,
}

/// Sizing for one axis, as parsed from strings like `"100p"`, `"1/3"`, `"2/n+"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeSpec {
    pub mode: SizeMode,
    /// Whether one spacing unit is reserved on each side along this axis
    pub spaced: bool,
}

impl SizeSpec {
    pub const fn new(mode: SizeMode) -> Self {
        Self { mode, spaced: true }
    }

    pub const fn points(points: f32) -> Self {
        Self::new(SizeMode::FixedPoints(points))
    }

    pub const fn fraction(numerator: u32, denominator: u32) -> Self {
        Self::new(SizeMode::FixedFraction { numerator, denominator })
    }

    pub const fn claims(claims: u32) -> Self {
        Self::new(SizeMode::VariableFraction { claims })
    }

    pub const fn equal(factor: f32) -> Self {
        Self::new(SizeMode::EqualToOtherAxis(factor))
    }

    pub const fn wrap() -> Self {
        Self::new(SizeMode::Wrap)
    }

    pub const fn unspaced(mut self) -> Self {
        self.spaced = false;
        self
    }

    /// Parse a sizing string for the given axis. Never fails: anything outside the
    /// grammar becomes [`SizeMode::Unconstrained`].
    ///
    /// | input        | mode                                   |
    /// |--------------|----------------------------------------|
    /// | `"120p"`     | `FixedPoints(120.0)`                   |
    /// | `"2/5"`      | `FixedFraction { 2, 5 }`               |
    /// | `"3/n"`      | `VariableFraction { claims: 3 }`       |
    /// | `""`         | `VariableFraction { claims: 1 }`       |
    /// | `"equal"`    | `EqualToOtherAxis(1.0)`                |
    /// | `"0.5h"`     | `EqualToOtherAxis(0.5)` (width only)   |
    /// | `"0.5w"`     | `EqualToOtherAxis(0.5)` (height only)  |
    /// | `"wrap"`     | `Wrap`                                 |
    ///
    /// A single trailing `+` on any form clears `spaced`.
    pub fn parse(input: &str, axis: Axis) -> Self {
        let (body, spaced) = match input.strip_suffix('+') {
            Some(body) => (body, false),
            None => (input, true),
        };

        let mode = Self::parse_mode(body, axis).unwrap_or_else(|| {
            tracing::debug!("Unrecognized size spec {:?} for {:?}, treating as unconstrained", input, axis);
            SizeMode::Unconstrained
        });

        Self { mode, spaced }
    }

    fn parse_mode(body: &str, axis: Axis) -> Option<SizeMode> {
        match body {
            "" => return Some(SizeMode::VariableFraction { claims: 1 }),
            "equal" => return Some(SizeMode::EqualToOtherAxis(1.0)),
            "wrap" => return Some(SizeMode::Wrap),
            _ => {}
        }

        if let Some((numerator, denominator)) = body.split_once('/') {
            let numerator = parse_digits(numerator)?;
            if denominator == "n" {
                return Some(SizeMode::VariableFraction { claims: numerator });
            }
            let denominator = parse_digits(denominator)?;
            if denominator == 0 {
                return None;
            }
            return Some(SizeMode::FixedFraction { numerator, denominator });
        }

        if let Some(points) = body.strip_suffix('p') {
            return parse_digits(points).map(|points| SizeMode::FixedPoints(points as f32));
        }

        if let Some(factor) = body.strip_suffix(axis.other().proportional_suffix()) {
            if !factor.is_empty() && factor.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
                return factor.parse::<f32>().ok().map(SizeMode::EqualToOtherAxis);
            }
        }

        None
    }

    pub fn is_rigid(&self) -> bool {
        matches!(self.mode, SizeMode::FixedPoints(_))
    }

    pub fn fixed_points(&self) -> Option<f32> {
        match self.mode {
            SizeMode::FixedPoints(points) => Some(points),
            _ => None,
        }
    }

    pub fn is_proportional(&self) -> bool {
        matches!(self.mode, SizeMode::EqualToOtherAxis(_))
    }

    pub fn is_wrap(&self) -> bool {
        matches!(self.mode, SizeMode::Wrap)
    }

    /// The string that parses back to this spec on `axis`.
    pub fn to_grammar(&self, axis: Axis) -> String {
        match self.mode {
            SizeMode::EqualToOtherAxis(factor) if factor != 1.0 => {
                let mut out = format!("{}{}", factor, axis.other().proportional_suffix());
                if !self.spaced {
                    out.push('+');
                }
                out
            }
            _ => self.to_string(),
        }
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        SizeSpec::claims(1)
    }
}

/// Writes the grammar form where it does not depend on the axis. A proportional factor
/// other than 1 names the other axis, so it prints as `<f>x` here and does not parse
/// back; [`SizeSpec::to_grammar`] gives the axis-correct form.
impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            SizeMode::FixedPoints(points) => write!(f, "{}p", points)?,
            SizeMode::EqualToOtherAxis(factor) if factor == 1.0 => f.write_str("equal")?,
            SizeMode::EqualToOtherAxis(factor) => write!(f, "{}x", factor)?,
            SizeMode::FixedFraction { numerator, denominator } => write!(f, "{}/{}", numerator, denominator)?,
            SizeMode::VariableFraction { claims } => write!(f, "{}/n", claims)?,
            SizeMode::Wrap => f.write_str("wrap")?,
            SizeMode::Unconstrained => f.write_str("?")?,
        }
        if !self.spaced {
            f.write_str("+")?;
        }
        Ok(())
    }
}

fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
