//! Announcement queue maintenance.

use bevy_ecs::prelude::*;

use crate::events::announce::Announcement;

/// Advance the ECS message queue for [`Announcement`].
///
/// Messages survive two updates, so a host that drains once per frame after
/// the schedule runs sees every line.
pub fn update_announcements(mut msgs: ResMut<Messages<Announcement>>) {
    msgs.update();
}
