//! Roster identities and per-player storage.
//!
//! A match seats one to `MAX_PLAYERS` players. Ids are dense and 0-based,
//! and they double as the tie-break order wherever the rules need one
//! (bomb placement, ranking).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Largest roster a match supports.
pub const MAX_PLAYERS: usize = 4;

/// Seat of a player in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Position in per-player storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every seat of a `player_count` roster, in id order.
    ///
    /// ```
    /// use hypersonic::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(2).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(MAX_PLAYERS) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// The roster never changes during a match, so the map never grows.
/// Eliminated players keep their slot.
///
/// ```
/// use hypersonic::core::{PlayerId, PlayerMap};
///
/// let mut bombs: PlayerMap<u8> = PlayerMap::new(2, |_| 1);
/// bombs[PlayerId::new(1)] += 1;
///
/// assert_eq!(bombs[PlayerId::new(0)], 1);
/// assert_eq!(bombs[PlayerId::new(1)], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    slots: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Fill every seat from `factory`.
    ///
    /// # Panics
    ///
    /// If `player_count` is 0 or above `MAX_PLAYERS`.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        Self::from_vec(PlayerId::all(player_count).map(factory).collect::<Vec<_>>())
            .with_len_checked(player_count)
    }

    /// Same value in every seat.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Seat `i` gets `slots[i]`.
    ///
    /// # Panics
    ///
    /// If `slots` is empty or longer than `MAX_PLAYERS`.
    pub fn from_vec(slots: Vec<T>) -> Self {
        assert!(
            (1..=MAX_PLAYERS).contains(&slots.len()),
            "A roster has 1 to {MAX_PLAYERS} players, got {}",
            slots.len()
        );
        Self { slots }
    }

    fn with_len_checked(self, expected: usize) -> Self {
        assert_eq!(self.slots.len(), expected, "A roster has 1 to {MAX_PLAYERS} players");
        self
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.slots.len()
    }

    /// True if `player` has a seat in this roster.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.slots.len()
    }

    /// `(seat, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.player_ids().zip(self.slots.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.player_ids().zip(self.slots.iter_mut())
    }

    /// Values in id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.slots.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.slots[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.slots[player.index()]
    }
}
