use std::fmt;

use log::debug;
use quadwarp_image::Image;

use crate::error::WarpError;

use super::{affine::AffineOp, op::TransformOp};

/// The families of imaging operations a registry can enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Per-sample table lookup.
    Lookup,
    /// Affine resampling.
    Affine,
    /// Kernel convolution.
    Convolve,
    /// Perspective resampling.
    Perspective,
}

impl OpKind {
    /// Every kind, in declaration order.
    pub const ALL: [OpKind; 4] = [
        OpKind::Lookup,
        OpKind::Affine,
        OpKind::Convolve,
        OpKind::Perspective,
    ];

    fn index(self) -> usize {
        match self {
            OpKind::Lookup => 0,
            OpKind::Affine => 1,
            OpKind::Convolve => 2,
            OpKind::Perspective => 3,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Lookup => "lookup",
            OpKind::Affine => "affine",
            OpKind::Convolve => "convolve",
            OpKind::Perspective => "perspective",
        };
        f.write_str(name)
    }
}

/// A configured imaging operation.
#[derive(Debug, Clone)]
pub enum ImagingOp {
    /// Affine resampling.
    Affine(AffineOp),
    /// Perspective resampling.
    Perspective(TransformOp),
}

impl ImagingOp {
    /// The family the operation belongs to.
    pub fn kind(&self) -> OpKind {
        match self {
            ImagingOp::Affine(_) => OpKind::Affine,
            ImagingOp::Perspective(_) => OpKind::Perspective,
        }
    }
}

impl From<AffineOp> for ImagingOp {
    fn from(op: AffineOp) -> Self {
        ImagingOp::Affine(op)
    }
}

impl From<TransformOp> for ImagingOp {
    fn from(op: TransformOp) -> Self {
        ImagingOp::Perspective(op)
    }
}

/// The set of operation kinds a caller allows to run.
///
/// Built once by the caller and passed to where operations are dispatched.
///
/// # Example
///
/// ```
/// use quadwarp_imgproc::warp::{OpKind, OpRegistry};
///
/// let registry = OpRegistry::new().without(OpKind::Affine);
/// assert!(registry.is_enabled(OpKind::Perspective));
/// assert!(!registry.is_enabled(OpKind::Affine));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpRegistry {
    enabled: [bool; 4],
}

impl Default for OpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OpRegistry {
    /// A registry with the resampling kinds enabled.
    pub fn new() -> Self {
        Self::empty().with(OpKind::Affine).with(OpKind::Perspective)
    }

    /// A registry with nothing enabled.
    pub fn empty() -> Self {
        Self {
            enabled: [false; 4],
        }
    }

    /// Enables `kind`.
    pub fn with(mut self, kind: OpKind) -> Self {
        self.enabled[kind.index()] = true;
        self
    }

    /// Disables `kind`.
    pub fn without(mut self, kind: OpKind) -> Self {
        self.enabled[kind.index()] = false;
        self
    }

    /// Whether `kind` may run.
    pub fn is_enabled(&self, kind: OpKind) -> bool {
        self.enabled[kind.index()]
    }

    /// The enabled kinds, in declaration order.
    pub fn enabled_kinds(&self) -> Vec<OpKind> {
        OpKind::ALL
            .into_iter()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }

    /// Runs `op` on `src` if its kind is enabled.
    ///
    /// # Errors
    ///
    /// [`WarpError::UnsupportedOp`] for a disabled kind, otherwise whatever
    /// the operation returns.
    pub fn filter<const C: usize>(
        &self,
        op: &ImagingOp,
        src: &Image<u8, C>,
        dst: Option<Image<u8, C>>,
    ) -> Result<Image<u8, C>, WarpError> {
        let kind = op.kind();
        if !self.is_enabled(kind) {
            return Err(WarpError::UnsupportedOp(kind.to_string()));
        }
        debug!("dispatching {kind} operation");
        match op {
            ImagingOp::Affine(op) => op.filter(src, dst),
            ImagingOp::Perspective(op) => op.filter(src, dst),
        }
    }
}

#[cfg(test)]
mod tests {
    use quadwarp_geometry::{AffineTransform, ProjectiveMatrix};
    use quadwarp_image::ImageSize;

    use super::*;
    use crate::{fill::FillPolicy, interpolation::InterpolationMode};

    fn src() -> Result<Image<u8, 1>, WarpError> {
        Ok(Image::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 2, 3, 4],
        )?)
    }

    #[test]
    fn default_kinds() {
        let registry = OpRegistry::default();
        assert_eq!(
            registry.enabled_kinds(),
            vec![OpKind::Affine, OpKind::Perspective]
        );
        assert!(!registry.is_enabled(OpKind::Lookup));
        assert!(OpRegistry::empty().enabled_kinds().is_empty());
        assert!(OpRegistry::empty().with(OpKind::Convolve).is_enabled(OpKind::Convolve));
    }

    #[test]
    fn dispatch() -> Result<(), WarpError> {
        let src = src()?;
        let registry = OpRegistry::new();

        let perspective: ImagingOp = TransformOp::from_matrix(ProjectiveMatrix::identity()).into();
        assert_eq!(perspective.kind(), OpKind::Perspective);
        assert_eq!(registry.filter(&perspective, &src, None)?, src);

        let affine: ImagingOp = AffineOp::new(
            AffineTransform::identity(),
            InterpolationMode::Nearest,
            FillPolicy::None,
        )
        .into();
        assert_eq!(affine.kind(), OpKind::Affine);
        assert_eq!(registry.filter(&affine, &src, None)?, src);
        Ok(())
    }

    #[test]
    fn disabled_kind_rejected() -> Result<(), WarpError> {
        let src = src()?;
        let registry = OpRegistry::new().without(OpKind::Perspective);
        let op = ImagingOp::from(TransformOp::from_matrix(ProjectiveMatrix::identity()));
        assert_eq!(
            registry.filter(&op, &src, None),
            Err(WarpError::UnsupportedOp("perspective".to_string()))
        );
        Ok(())
    }
}
