//! Step controls for the selected item

use crate::design::{step_rotation, step_scale, DesignResult, DesignState, FurniturePatch};

pub const ROTATION_STEP: f32 = 15.0;
pub const SCALE_STEP: f32 = 0.1;

/// Rotate the selection by one step. Returns false when nothing is selected.
pub fn rotate_selected(state: &mut DesignState, clockwise: bool) -> DesignResult<bool> {
    let Some(item) = state.selected_furniture() else {
        return Ok(false);
    };
    let delta = if clockwise { ROTATION_STEP } else { -ROTATION_STEP };
    let id = item.instance_id;
    let rotation = step_rotation(item.rotation, delta);
    state.update_furniture(id, FurniturePatch::rotation(rotation))?;
    Ok(true)
}

pub fn scale_selected(state: &mut DesignState, grow: bool) -> DesignResult<bool> {
    let Some(item) = state.selected_furniture() else {
        return Ok(false);
    };
    let delta = if grow { SCALE_STEP } else { -SCALE_STEP };
    let id = item.instance_id;
    let scale = step_scale(item.scale, delta);
    state.update_furniture(id, FurniturePatch::scale(scale))?;
    Ok(true)
}

pub fn remove_selected(state: &mut DesignState) -> DesignResult<bool> {
    let Some(id) = state.selected() else {
        return Ok(false);
    };
    state.remove_furniture(id)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::MemoryDesignStore;
    use std::rc::Rc;

    fn state() -> DesignState {
        DesignState::new(Box::new(MemoryDesignStore::new()), Rc::new(Catalog::builtin()), "u1")
    }

    #[test]
    fn test_nothing_selected_is_a_no_op() {
        let mut state = state();
        assert!(!rotate_selected(&mut state, true).unwrap());
        assert!(!scale_selected(&mut state, true).unwrap());
        assert!(!remove_selected(&mut state).unwrap());
    }

    #[test]
    fn test_rotation_wraps() {
        let mut state = state();
        let id = state.add_furniture("chair-1", 100.0, 100.0).unwrap();
        rotate_selected(&mut state, false).unwrap();
        assert_eq!(state.design().instance(id).unwrap().rotation, 345.0);
        for _ in 0..24 {
            rotate_selected(&mut state, true).unwrap();
        }
        assert_eq!(state.design().instance(id).unwrap().rotation, 345.0);
    }

    #[test]
    fn test_scale_steps_clamp() {
        let mut state = state();
        let id = state.add_furniture("chair-1", 100.0, 100.0).unwrap();
        for _ in 0..20 {
            scale_selected(&mut state, true).unwrap();
        }
        assert_eq!(state.design().instance(id).unwrap().scale, 2.0);
        for _ in 0..20 {
            scale_selected(&mut state, false).unwrap();
        }
        assert_eq!(state.design().instance(id).unwrap().scale, 0.5);
        scale_selected(&mut state, true).unwrap();
        assert_eq!(state.design().instance(id).unwrap().scale, 0.6);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut state = state();
        let id = state.add_furniture("chair-1", 100.0, 100.0).unwrap();
        assert!(remove_selected(&mut state).unwrap());
        assert!(!state.design().contains(id));
        assert_eq!(state.selected(), None);
    }
}
