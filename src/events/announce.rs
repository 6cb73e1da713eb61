//! Player-visible flavor text.
//!
//! The encounter never talks to clients directly. Emotes and overhead lines
//! are written as [`Announcement`] messages; the host drains
//! `Messages<Announcement>` and renders them however it likes.
//! [`update_announcements`](crate::systems::announce::update_announcements)
//! advances the queue once per frame.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::*;

pub const HUE_SHADOW: u16 = 1109;
pub const HUE_WARNING: u16 = 33;
pub const HUE_NEUTRAL: u16 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnounceStyle {
    /// `*text*` seen by everyone around the speaker.
    Emote,
    /// Plain text above the speaker's head.
    Overhead,
    /// Text shown only to the speaker (usually a player).
    Private,
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub speaker: Entity,
    pub style: AnnounceStyle,
    pub hue: u16,
    pub text: String,
}

/// Queue an announcement if the world has an announcement queue.
pub fn announce(
    world: &mut World,
    speaker: Entity,
    style: AnnounceStyle,
    hue: u16,
    text: impl Into<String>,
) {
    if let Some(mut queue) = world.get_resource_mut::<Messages<Announcement>>() {
        queue.write(Announcement {
            speaker,
            style,
            hue,
            text: text.into(),
        });
    }
}
