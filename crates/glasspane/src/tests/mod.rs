mod app;
mod hotkeys;
mod storage;
mod window;
