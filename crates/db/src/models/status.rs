//! Status helper enum mapping to the `song_statuses` SMALLINT lookup table.
//!
//! Variant discriminants match the seed data order (1-based) in the
//! migration; the seed order must never change.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Song generation lifecycle status.
    ///
    /// `Queued` and `Processing` are transient; the rest are terminal.
    /// Allowed transitions: `Queued -> Processing`, `Queued -> NoCredits`,
    /// and `Processing -> {Processed, Failed}`. Terminal statuses never
    /// change again.
    SongStatus {
        Queued = 1,
        Processing = 2,
        Processed = 3,
        Failed = 4,
        NoCredits = 5,
    }
}

impl SongStatus {
    /// Reverse lookup from a database status ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Queued),
            2 => Some(Self::Processing),
            3 => Some(Self::Processed),
            4 => Some(Self::Failed),
            5 => Some(Self::NoCredits),
            _ => None,
        }
    }

    /// Whether this status is terminal (the row will never change status
    /// again).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Processed | Self::Failed | Self::NoCredits)
    }

    /// Lookup-table name for this status, as seeded in the migration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Failed => "failed",
            Self::NoCredits => "no_credits",
        }
    }
}
