use std::fmt;

/// The closed catalog of attribute kinds a mesh can carry.
///
/// All attributes are stored as single-precision floats, so the byte size of a row is fully
/// determined by the kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttribKind {
    Position,
    TexCoord,
    Normal,
    Binormal,
    Tangent,
}

impl AttribKind {
    /// Every attribute kind in declaration order.
    pub const ALL: [AttribKind; 5] = [
        AttribKind::Position,
        AttribKind::TexCoord,
        AttribKind::Normal,
        AttribKind::Binormal,
        AttribKind::Tangent,
    ];

    /// Number of scalar components in a single row of this kind.
    #[inline]
    pub const fn num_components(self) -> usize {
        match self {
            AttribKind::TexCoord => 2,
            AttribKind::Position | AttribKind::Normal | AttribKind::Binormal | AttribKind::Tangent => {
                3
            }
        }
    }

    /// Size of a single row of this kind in bytes.
    #[inline]
    pub const fn byte_size(self) -> usize {
        self.num_components() * std::mem::size_of::<f32>()
    }

    /// A short human readable name.
    pub fn name(self) -> &'static str {
        match self {
            AttribKind::Position => "position",
            AttribKind::TexCoord => "texcoord",
            AttribKind::Normal => "normal",
            AttribKind::Binormal => "binormal",
            AttribKind::Tangent => "tangent",
        }
    }
}

impl fmt::Display for AttribKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
