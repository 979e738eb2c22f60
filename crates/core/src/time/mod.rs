pub mod week_slots;
