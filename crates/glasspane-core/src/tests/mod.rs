mod events;
mod keybinds;
