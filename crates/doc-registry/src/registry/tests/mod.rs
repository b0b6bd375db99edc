mod common;
mod loading;
mod routing;
