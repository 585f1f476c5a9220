use core::fmt;
use core::ops::{BitOr, BitOrAssign};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Face {
    Up = 0,
    Down = 1,
    North = 2,
    East = 3,
    South = 4,
    West = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::North,
        Face::East,
        Face::South,
        Face::West,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face`.
    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    /// Integer grid step `(dx,dy,dz)` when leaving through this face.
    /// +Y up, -Y down, -Z north, +Z south, +X east, -X west.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Up => (0, 1, 0),
            Face::Down => (0, -1, 0),
            Face::North => (0, 0, -1),
            Face::East => (1, 0, 0),
            Face::South => (0, 0, 1),
            Face::West => (-1, 0, 0),
        }
    }

    /// Lower-case key used by atlas files.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Face::Up => "up",
            Face::Down => "down",
            Face::North => "north",
            Face::East => "east",
            Face::South => "south",
            Face::West => "west",
        }
    }

    pub fn from_name(s: &str) -> Option<Face> {
        match s {
            "up" => Some(Face::Up),
            "down" => Some(Face::Down),
            "north" => Some(Face::North),
            "east" => Some(Face::East),
            "south" => Some(Face::South),
            "west" => Some(Face::West),
            _ => None,
        }
    }

    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of exposed faces, one bit per [`Face`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    pub const EMPTY: FaceMask = FaceMask(0);
    pub const UP: FaceMask = FaceMask(Face::Up.bit());
    pub const DOWN: FaceMask = FaceMask(Face::Down.bit());
    pub const NORTH: FaceMask = FaceMask(Face::North.bit());
    pub const EAST: FaceMask = FaceMask(Face::East.bit());
    pub const SOUTH: FaceMask = FaceMask(Face::South.bit());
    pub const WEST: FaceMask = FaceMask(Face::West.bit());
    pub const ALL: FaceMask = FaceMask(0b11_1111);

    /// Keeps only the six defined bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        FaceMask(bits & Self::ALL.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, face: Face) {
        self.0 |= face.bit();
    }

    #[inline]
    pub const fn with(self, face: Face) -> Self {
        FaceMask(self.0 | face.bit())
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Exposed faces in `Face::ALL` order.
    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<Face> for FaceMask {
    fn from(face: Face) -> Self {
        FaceMask(face.bit())
    }
}

impl BitOr for FaceMask {
    type Output = FaceMask;
    #[inline]
    fn bitor(self, rhs: FaceMask) -> FaceMask {
        FaceMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for FaceMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: FaceMask) {
        self.0 |= rhs.0;
    }
}
