//! Value types used by the line searches.


/// One evaluated point on the line being searched:
/// the input `x`, the output `f(x)`, and optionally
/// the slope `f'(x)`.
/// The slope is lazily computed, so it stays `None`
/// until some phase of the search needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputOutputSlopeTriplet {
    /// The input `x`.
    pub input: f64,
    /// The output `f(x)`.
    pub output: f64,
    /// The slope `f'(x)`, if measured.
    pub slope: Option<f64>,
}


impl InputOutputSlopeTriplet {
    /// A point with no measured slope.
    pub fn new(input: f64, output: f64) -> Self {
        Self { input, output, slope: None, }
    }


    /// A point with a measured slope.
    pub fn with_slope(input: f64, output: f64, slope: f64) -> Self {
        Self { input, output, slope: Some(slope), }
    }
}


/// An interval guaranteed to contain a local minimum
/// of the scalar function being searched.
/// `lower` and `upper` name the two ends;
/// during the derivative-based search the order may be
/// reversed (`lower.input > upper.input`) to record
/// a slope sign change.
/// `other` holds a third evaluated point used by the
/// parabolic interpolator of the derivative-free search.
#[derive(Debug, Clone)]
pub struct LineBracket {
    /// One end of the bracket.
    pub lower: InputOutputSlopeTriplet,
    /// The other end of the bracket.
    pub upper: InputOutputSlopeTriplet,
    /// An interior point for higher-order fits.
    pub other: Option<InputOutputSlopeTriplet>,
}


impl LineBracket {
    /// A bracket with no interior point.
    pub fn new(
        lower: InputOutputSlopeTriplet,
        upper: InputOutputSlopeTriplet,
    ) -> Self
    {
        Self { lower, upper, other: None, }
    }


    /// The signed width `upper.input - lower.input`.
    pub fn width(&self) -> f64 {
        self.upper.input - self.lower.input
    }


    /// The end with the smaller function value.
    pub fn best(&self) -> InputOutputSlopeTriplet {
        if self.lower.output <= self.upper.output {
            self.lower
        } else {
            self.upper
        }
    }
}
