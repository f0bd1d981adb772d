use std::collections::HashSet;

use marionette_core::MarionetteError;

use crate::actor::Actor;
use crate::picture::Picture;

/// Check an actor's drawable tree and draw order for structural consistency.
pub fn validate_actor(actor: &Actor) -> Result<(), Vec<MarionetteError>> {
    let mut errors = Vec::new();
    let tree = actor.tree();
    let who = actor.name();

    let mut names = HashSet::new();
    for (id, node) in tree.iter() {
        if !names.insert(node.name()) {
            errors.push(MarionetteError::Validation(format!(
                "duplicate drawable name '{}' in actor '{who}'",
                node.name()
            )));
        }

        // Parent and child lists must agree in both directions.
        match node.parent() {
            Some(parent) => match tree.get(parent) {
                Some(p) if p.children().contains(&id) => {}
                Some(p) => errors.push(MarionetteError::Validation(format!(
                    "drawable '{}' names '{}' as parent but is not among its children",
                    node.name(),
                    p.name()
                ))),
                None => errors.push(MarionetteError::Validation(format!(
                    "drawable '{}' has a stale parent handle",
                    node.name()
                ))),
            },
            None if !tree.roots().contains(&id) => {
                errors.push(MarionetteError::Validation(format!(
                    "drawable '{}' has no parent but is not a root",
                    node.name()
                )));
            }
            None => {}
        }
        for &child in node.children() {
            if tree.get(child).and_then(|c| c.parent()) != Some(id) {
                errors.push(MarionetteError::Validation(format!(
                    "child {child:?} of '{}' does not point back to it",
                    node.name()
                )));
            }
        }

        if node.actor() != actor.id() {
            errors.push(MarionetteError::Validation(format!(
                "drawable '{}' refers to a different actor than '{who}'",
                node.name()
            )));
        }

        let keys = node.angle_channel().keyframes();
        if keys.windows(2).any(|w| w[0].time >= w[1].time) {
            errors.push(MarionetteError::Validation(format!(
                "angle keyframes of '{}' are not strictly ascending",
                node.name()
            )));
        }
    }

    for &root in tree.roots() {
        if tree.get(root).is_some_and(|r| r.parent().is_some()) {
            errors.push(MarionetteError::Validation(format!(
                "root {root:?} of actor '{who}' has a parent"
            )));
        }
    }

    let reachable: HashSet<_> = tree.depth_first().into_iter().collect();
    if reachable.len() != tree.len() {
        errors.push(MarionetteError::Validation(format!(
            "{} drawables of actor '{who}' are unreachable from its roots",
            tree.len().saturating_sub(reachable.len())
        )));
    }

    let drawn: HashSet<_> = actor.draw_order().iter().copied().collect();
    if drawn.len() != actor.draw_order().len() || drawn != reachable || drawn.len() != tree.len() {
        errors.push(MarionetteError::Validation(format!(
            "draw order of actor '{who}' does not list each drawable exactly once"
        )));
    }

    let positions = actor.position_channel().keyframes();
    if positions.windows(2).any(|w| w[0].time >= w[1].time) {
        errors.push(MarionetteError::Validation(format!(
            "position keyframes of actor '{who}' are not strictly ascending"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate every actor in the picture, plus picture-level naming.
pub fn validate_picture(picture: &Picture) -> Result<(), Vec<MarionetteError>> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for (id, actor) in picture.actors() {
        if !names.insert(actor.name()) {
            errors.push(MarionetteError::Validation(format!(
                "duplicate actor name '{}'",
                actor.name()
            )));
        }
        if actor.id() != Some(id) {
            errors.push(MarionetteError::Validation(format!(
                "actor '{}' does not know its own handle",
                actor.name()
            )));
        }
        if let Err(mut actor_errors) = validate_actor(actor) {
            errors.append(&mut actor_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::DrawableNode;
    use crate::shape::ShapeKind;

    fn puppet(name: &str) -> Actor {
        let mut actor = Actor::new(name);
        let torso = actor.add_root(DrawableNode::new("torso", ShapeKind::Empty)).unwrap();
        let arm = actor.add_child(torso, DrawableNode::new("arm", ShapeKind::Empty)).unwrap();
        actor.add_child(arm, DrawableNode::new("hand", ShapeKind::Empty)).unwrap();
        actor
    }

    #[test]
    fn test_valid_actor() {
        assert!(validate_actor(&puppet("harold")).is_ok());
    }

    #[test]
    fn test_valid_picture() {
        let mut picture = Picture::new();
        picture.add_actor(puppet("harold"));
        picture.add_actor(puppet("sparty"));
        assert!(validate_picture(&picture).is_ok());
    }

    #[test]
    fn test_duplicate_names() {
        let mut actor = puppet("harold");
        let torso = actor.find("torso").unwrap();
        actor.add_child(torso, DrawableNode::new("arm", ShapeKind::Empty)).unwrap();
        let errors = validate_actor(&actor).unwrap_err();
        assert_eq!(errors.len(), 1);

        let mut picture = Picture::new();
        picture.add_actor(puppet("harold"));
        picture.add_actor(puppet("harold"));
        assert_eq!(validate_picture(&picture).unwrap_err().len(), 1);
    }

    #[test]
    fn test_broken_back_link_detected() {
        let mut actor = puppet("harold");
        let torso = actor.find("torso").unwrap();
        let hand = actor.find("hand").unwrap();
        // Point the hand at the torso without updating either child list.
        actor.tree_mut().nodes[hand].parent = Some(torso);
        let errors = validate_actor(&actor).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("not among its children")));
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("does not point back")));
    }

    #[test]
    fn test_orphan_detected() {
        let mut actor = puppet("harold");
        let arm = actor.find("arm").unwrap();
        let torso = actor.find("torso").unwrap();
        // Drop the arm from the torso and clear its parent: it is neither a
        // child nor a root.
        actor.tree_mut().nodes[torso].children.clear();
        actor.tree_mut().nodes[arm].parent = None;
        let errors = validate_actor(&actor).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("not a root")));
        assert!(errors.iter().any(|e| e.to_string().contains("unreachable")));
    }

    #[test]
    fn test_actor_back_reference_checked() {
        let mut picture = Picture::new();
        let id = picture.add_actor(puppet("harold"));
        let actor = picture.actor_mut(id).unwrap();
        let arm = actor.find("arm").unwrap();
        actor.tree_mut().nodes[arm].actor = None;
        assert!(validate_picture(&picture).is_err());
    }
}
