use std::marker::PhantomData;

use bevy::prelude::*;

/// Points from a scene's `AnimationPlayer` back to the gameplay entity owning the scene.
#[derive(Component, Reflect)]
#[relationship(relationship_target = HasAnimationPlayer)]
pub struct AnimationPlayerOf(pub Entity);

#[derive(Component, Reflect)]
#[relationship_target(relationship = AnimationPlayerOf, linked_spawn)]
pub struct HasAnimationPlayer(Entity);

/// Links every `AnimationPlayer` spawned below a `T` entity to that entity.
///
/// glTF scenes spawn their animation player somewhere inside the model
/// hierarchy; the link lets observers on [`AnimationPlayerOf`] set the player up
/// as soon as it exists.
#[derive(Default)]
pub struct LinkAnimationPlayerPluginFor<T: Component>(PhantomData<T>);

impl<T: Component> Plugin for LinkAnimationPlayerPluginFor<T> {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, link_new_animation_players::<T>);
    }
}

fn link_new_animation_players<T: Component>(
    mut commands: Commands,
    added: Query<Entity, Added<AnimationPlayer>>,
    roots: Query<(), With<T>>,
    parents: Query<&ChildOf>,
) {
    for player in added.iter() {
        let Some(root) = parents
            .iter_ancestors(player)
            .find(|ancestor| roots.contains(*ancestor))
        else {
            debug!("animation player {player} has no owning root");
            continue;
        };

        commands.entity(player).insert(AnimationPlayerOf(root));
    }
}
