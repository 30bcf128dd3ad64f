//! Macros for wiring concrete states into an automaton.

/// Implement [`IntoState`](crate::core::IntoState) for concrete states.
///
/// The left-hand side is the automaton's state-contract type, the right-hand
/// side the states that belong to it.
///
/// # Example
///
/// ```
/// use automata::core::{Lifecycle, StateContract, StateBinding, TypedState};
/// use automata::machine::Automaton;
/// use automata::register_states;
/// use std::rc::Rc;
///
/// struct Door;
///
/// trait DoorState: StateContract<Door> {}
///
/// type DoorAutomaton = Automaton<dyn DoorState, Door>;
///
/// #[derive(Default)]
/// struct Closed {
///     binding: StateBinding<DoorAutomaton, Door>,
/// }
///
/// impl Lifecycle for Closed {}
///
/// impl TypedState<Door> for Closed {
///     type Automaton = DoorAutomaton;
///
///     fn binding(&self) -> &StateBinding<DoorAutomaton, Door> {
///         &self.binding
///     }
/// }
///
/// impl DoorState for Closed {}
///
/// register_states!(dyn DoorState => Closed);
///
/// let automaton = DoorAutomaton::new();
/// automaton.initiate::<Closed>(Rc::new(Door)).unwrap();
/// assert!(automaton.is_current_state::<Closed>());
/// ```
#[macro_export]
macro_rules! register_states {
    ($family:ty => $($state:ty),+ $(,)?) => {
        $(
            impl $crate::core::IntoState<$family> for $state {
                fn into_state(self: ::std::rc::Rc<Self>) -> ::std::rc::Rc<$family> {
                    self
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{IntoState, Lifecycle, StateBinding, StateContract, TypedState};
    use crate::machine::Automaton;
    use std::rc::Rc;

    trait Shape: StateContract<()> {
        fn corners(&self) -> u32;
    }

    type Canvas = Automaton<dyn Shape, ()>;

    #[derive(Default)]
    struct Square {
        binding: StateBinding<Canvas, ()>,
    }

    #[derive(Default)]
    struct Circle {
        binding: StateBinding<Canvas, ()>,
    }

    impl Lifecycle for Square {}
    impl Lifecycle for Circle {}

    impl TypedState<()> for Square {
        type Automaton = Canvas;

        fn binding(&self) -> &StateBinding<Canvas, ()> {
            &self.binding
        }
    }

    impl TypedState<()> for Circle {
        type Automaton = Canvas;

        fn binding(&self) -> &StateBinding<Canvas, ()> {
            &self.binding
        }
    }

    impl Shape for Square {
        fn corners(&self) -> u32 {
            4
        }
    }

    impl Shape for Circle {
        fn corners(&self) -> u32 {
            0
        }
    }

    register_states!(dyn Shape => Square, Circle,);

    #[test]
    fn registered_states_upcast_to_family() {
        let shapes: Vec<Rc<dyn Shape>> = vec![
            Rc::new(Square::default()).into_state(),
            Rc::new(Circle::default()).into_state(),
        ];

        let corners: Vec<u32> = shapes.iter().map(|shape| shape.corners()).collect();
        assert_eq!(corners, vec![4, 0]);
    }

    #[test]
    fn upcast_keeps_the_same_allocation() {
        let square = Rc::new(Square::default());
        let shape: Rc<dyn Shape> = Rc::clone(&square).into_state();

        assert_eq!(Rc::strong_count(&square), 2);
        drop(shape);
        assert_eq!(Rc::strong_count(&square), 1);
    }

    #[test]
    fn registered_states_are_usable_by_the_automaton() {
        let canvas = Canvas::new();
        canvas.initiate::<Square>(Rc::new(())).unwrap();
        canvas.transit::<Circle>().unwrap();

        assert_eq!(canvas.dispatch(|shape| shape.corners()).unwrap(), 0);
    }
}
