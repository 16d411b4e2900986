use num_traits::Zero;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::subtle::Choice;
use p256::elliptic_curve::{DecompressPoint, Group, PrimeField};
use p256::{AffinePoint, FieldBytes, Scalar};

use super::*;

/// Order of the P-256 base point.
const P256_ORDER: &str = "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551";

/// Width of a P-256 field element or scalar in bytes.
const FIELD_BYTES: usize = 32;

/// The NIST P-256 group, with scalars handled as plain integers.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveGroup {
    order: BigUint,
    base: ProjectivePoint,
}

impl CurveGroup {
    pub fn p256() -> Self {
        Self {
            order: BigUint::parse_bytes(P256_ORDER.as_bytes(), 16).expect("Valid hex constant"),
            base: ProjectivePoint::GENERATOR,
        }
    }

    pub fn base_point(&self) -> &ProjectivePoint {
        &self.base
    }

    /// Reduce an integer modulo the group order into a curve scalar.
    pub fn to_scalar(&self, value: &BigUint) -> Scalar {
        let reduced = value % &self.order;
        let bytes = field_bytes(&reduced).expect("Reduced below the group order");
        Option::<Scalar>::from(Scalar::from_repr(bytes)).expect("Reduced below the group order")
    }

    pub fn is_identity(&self, point: &ProjectivePoint) -> bool {
        point.is_identity().into()
    }

    /// Affine `(x, y)`, or `None` for the point at infinity.
    pub fn coordinates(&self, point: &ProjectivePoint) -> Option<(BigUint, BigUint)> {
        affine_coordinates(point)
    }

    pub fn x_coordinate(&self, point: &ProjectivePoint) -> Option<BigUint> {
        self.coordinates(point).map(|(x, _)| x)
    }

    /// Find the point with the given `x`, choosing `y` by parity.
    /// `None` if no point on the curve has this `x`.
    pub fn recover_point(&self, x: &BigUint, y_is_odd: bool) -> Option<ProjectivePoint> {
        let bytes = field_bytes(x)?;
        let affine: Option<AffinePoint> =
            AffinePoint::decompress(&bytes, Choice::from(y_is_odd as u8)).into();
        affine.map(ProjectivePoint::from)
    }
}

impl CyclicGroup for CurveGroup {
    type Element = ProjectivePoint;

    const FIELDS: usize = 2;

    fn identity(&self) -> ProjectivePoint {
        ProjectivePoint::IDENTITY
    }

    fn generator(&self) -> &ProjectivePoint {
        &self.base
    }

    fn order(&self) -> &BigUint {
        &self.order
    }

    fn operate(&self, a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
        *a + *b
    }

    fn invert(&self, a: &ProjectivePoint) -> Result<ProjectivePoint> {
        Ok(-*a)
    }

    fn power(&self, base: &ProjectivePoint, exponent: &BigUint) -> ProjectivePoint {
        *base * self.to_scalar(exponent)
    }

    fn to_fields(&self, element: &ProjectivePoint) -> Vec<BigUint> {
        point_fields(element).to_vec()
    }

    fn from_fields(&self, fields: &[BigUint]) -> Option<ProjectivePoint> {
        let (x, y) = match fields {
            [x, y] => (x, y),
            _ => return None,
        };
        if x.is_zero() && y.is_zero() {
            return Some(ProjectivePoint::IDENTITY);
        }
        let point = self.recover_point(x, y.bit(0))?;
        // Recovery only looks at the parity of y, so confirm the full value.
        match self.coordinates(&point) {
            Some((_, recovered_y)) if &recovered_y == y => Some(point),
            _ => None,
        }
    }
}

fn affine_coordinates(point: &ProjectivePoint) -> Option<(BigUint, BigUint)> {
    let encoded = point.to_encoded_point(false);
    let x = BigUint::from_bytes_be(encoded.x()?);
    let y = BigUint::from_bytes_be(encoded.y()?);
    Some((x, y))
}

/// The identity has no affine coordinates and is written as `(0, 0)`,
/// which is not on the curve.
pub(crate) fn point_fields(point: &ProjectivePoint) -> [BigUint; 2] {
    match affine_coordinates(point) {
        Some((x, y)) => [x, y],
        None => [BigUint::zero(), BigUint::zero()],
    }
}

/// Big-endian, zero-padded to the field width. `None` if the value is too wide.
fn field_bytes(value: &BigUint) -> Option<FieldBytes> {
    let bytes = value.to_bytes_be();
    if bytes.len() > FIELD_BYTES {
        return None;
    }
    let mut padded = FieldBytes::default();
    padded[FIELD_BYTES - bytes.len()..].copy_from_slice(&bytes);
    Some(padded)
}
