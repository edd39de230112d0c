//! Core plugin: shared resources and global settings.

use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::schedule;
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.init_resource::<SimRng>();
    app.insert_resource(ClearColor(Color::srgb(0.18, 0.03, 0.05)));
    schedule::configure(app);
}
