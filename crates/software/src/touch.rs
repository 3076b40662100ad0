//! Edge detection over the touch sensor's channel bitmask, and the meaning assigned to each channel.
//!
//! The sensor reports levels, not events. Each cycle the new level snapshot is compared against the previous one:
//! a channel that went from untouched to touched was pressed, one that went the other way was released. There is no
//! timing-based debounce here; the sensor's own filtering is relied upon.

use crate::{
    octave::OctaveDirection,
    scale_degree::ScaleDegree,
    voltage_table::TOUCH_CHANNEL_COUNT,
};
use tinyvec::{ArrayVec, array_vec};

/// Bits of the raw reading that correspond to a channel.
const CHANNEL_MASK: u16 = (1 << TOUCH_CHANNEL_COUNT) - 1;

/// Channel which lowers the octave.
const OCTAVE_DOWN_CHANNEL: u8 = 9;

/// Channel which raises the octave.
const OCTAVE_UP_CHANNEL: u8 = 10;

/// One of the touch sensor's channels (electrodes), numbered from zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchChannel(u8);

/// What a [`TouchChannel`] does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelRole {
    /// Plays a scale degree. Channels 1 through 8.
    Note(ScaleDegree),
    /// Steps the octave. Channel 9 steps down, channel 10 steps up.
    Octave(OctaveDirection),
    /// Reserved; presses do nothing. Channels 0 and 11.
    Unassigned,
}

impl TouchChannel {
    /// Constructs a [`TouchChannel`], or `None` if the sensor has no such channel.
    pub fn new(number: u8) -> Option<Self> {
        (usize::from(number) < TOUCH_CHANNEL_COUNT).then_some(Self(number))
    }

    /// Returns every channel in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..TOUCH_CHANNEL_COUNT as u8).map(Self)
    }

    /// Returns the channel number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Returns what pressing this channel does.
    pub fn role(self) -> ChannelRole {
        match self.0 {
            n @ 1..=8 => ScaleDegree::from_index(usize::from(n) - 1)
                .map_or(ChannelRole::Unassigned, ChannelRole::Note),
            OCTAVE_DOWN_CHANNEL => ChannelRole::Octave(OctaveDirection::Down),
            OCTAVE_UP_CHANNEL => ChannelRole::Octave(OctaveDirection::Up),
            _ => ChannelRole::Unassigned,
        }
    }

    /// Returns `true` for the channels that play a scale degree.
    pub fn is_note(self) -> bool {
        matches!(self.role(), ChannelRole::Note(_))
    }

    fn bit(self) -> u16 {
        1 << self.0
    }
}

/// A transition of a single channel between consecutive snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Untouched, then touched.
    Press,
    /// Touched, then untouched.
    Release,
}

/// The level state of a single channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    /// Not being touched.
    #[default]
    Idle,
    /// Being touched.
    Pressed,
}

impl ChannelState {
    /// Returns the state after observing `touched`, along with the edge crossed to get there (if any).
    pub fn next(self, touched: bool) -> (Self, Option<Edge>) {
        match (self, touched) {
            (Self::Idle, true) => (Self::Pressed, Some(Edge::Press)),
            (Self::Pressed, false) => (Self::Idle, Some(Edge::Release)),
            (state, _) => (state, None),
        }
    }
}

/// Channels pressed and released between two consecutive snapshots, each in ascending order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEdges {
    pressed: ArrayVec<[TouchChannel; TOUCH_CHANNEL_COUNT]>,
    released: ArrayVec<[TouchChannel; TOUCH_CHANNEL_COUNT]>,
}

impl TouchEdges {
    fn empty() -> Self {
        Self {
            pressed: array_vec!(),
            released: array_vec!(),
        }
    }

    /// Channels that went from untouched to touched.
    pub fn pressed(&self) -> &[TouchChannel] {
        &self.pressed
    }

    /// Channels that went from touched to untouched.
    pub fn released(&self) -> &[TouchChannel] {
        &self.released
    }

    /// Returns `true` if `channel` was pressed.
    pub fn is_pressed(&self, channel: TouchChannel) -> bool {
        self.pressed.contains(&channel)
    }

    /// Returns `true` if `channel` was released.
    pub fn is_released(&self, channel: TouchChannel) -> bool {
        self.released.contains(&channel)
    }

    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty() && self.released.is_empty()
    }
}

/// Retains the previous touch snapshot and derives edges from each new one.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchScanner {
    previous: u16,
}

impl TouchScanner {
    /// Constructs a [`TouchScanner`] which assumes nothing is touched at power-up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps each channel's [`ChannelState`] from the previous snapshot to `raw`, collecting the edges crossed, then
    /// keeps `raw` as the new previous snapshot.
    ///
    /// Bits above the last channel are ignored.
    pub fn scan(&mut self, raw: u16) -> TouchEdges {
        let current = raw & CHANNEL_MASK;
        let mut edges = TouchEdges::empty();
        for channel in TouchChannel::all() {
            let (_, edge) = self
                .channel_state(channel)
                .next(current & channel.bit() != 0);
            match edge {
                Some(Edge::Press) => edges.pressed.push(channel),
                Some(Edge::Release) => edges.released.push(channel),
                None => {}
            }
        }
        self.previous = current;
        edges
    }

    /// Returns the snapshot taken by the most recent scan.
    pub fn previous(&self) -> u16 {
        self.previous
    }

    /// Returns the level state of `channel` as of the most recent scan.
    pub fn channel_state(&self, channel: TouchChannel) -> ChannelState {
        if self.previous & channel.bit() != 0 {
            ChannelState::Pressed
        } else {
            ChannelState::Idle
        }
    }
}
