mod entities;
mod floor;
mod lifecycle;
mod wall;
