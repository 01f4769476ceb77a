use std::{thread, time};

use ghx_autotile::{
    generator::{
        builder::GeneratorBuilder, observer::GenerationUpdate, GeneratedTile, RngMode,
    },
    grid::{GridData, GridDefinition},
    tileset::TileSet,
    transition::Corner,
};
use image::{Rgba, RgbaImage};

pub enum GenerationViewMode {
    StepByStep(u64),
    Final,
}

const GENERATION_VIEW_MODE: GenerationViewMode = GenerationViewMode::Final;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Biome {
    Meadows,
    Forest,
    Beach,
    Sea,
}

const BIOMES: &'static [Biome] = &[Biome::Meadows, Biome::Forest, Biome::Beach, Biome::Sea];

fn icon(biome: Biome) -> &'static str {
    match biome {
        Biome::Meadows => "🟩",
        Biome::Forest => "🌲",
        Biome::Beach => "🟨",
        Biome::Sea => "🟦",
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let atlas: Vec<RgbaImage> = [
        [90, 170, 70],
        [30, 100, 40],
        [230, 210, 140],
        [40, 90, 200],
    ]
    .iter()
    .map(|[r, g, b]| RgbaImage::from_pixel(16, 16, Rgba([*r, *g, *b, 255])))
    .collect();

    let mut tileset = TileSet::new("coast", BIOMES.to_vec(), &atlas);
    // The sea only touches the beach
    tileset.set_exclusive_transition(Biome::Sea).unwrap();
    tileset
        .add_tile_transition_set(Biome::Beach, [Biome::Sea])
        .unwrap();
    tileset
        .add_tile_transition_set(Biome::Forest, [Biome::Beach])
        .unwrap();
    tileset.regenerate_images();
    tileset.validate().unwrap();

    let mut builder = GeneratorBuilder::new()
        .with_tileset(tileset)
        .with_grid(GridDefinition::new(24, 12))
        .with_rng(RngMode::RandomSeed);
    let mut observer = builder.add_queued_stateful_observer();
    let mut generator = builder.build();
    println!("Seed: {}", generator.seed());

    match GENERATION_VIEW_MODE {
        GenerationViewMode::Final => {
            generator.generate().unwrap();
            observer.dequeue_all();
            display_grid(observer.grid_data());
        }
        GenerationViewMode::StepByStep(delay) => {
            generator.generate().unwrap();
            while let Some(update) = observer.dequeue_one() {
                if let GenerationUpdate::Done = update {
                    break;
                }
                display_grid(observer.grid_data());
                thread::sleep(time::Duration::from_millis(delay));
            }
        }
    }
}

/// Each tile is drawn as its 4 corners, on two lines
fn display_grid(data_grid: &GridData<Option<GeneratedTile<Biome>>>) {
    let grid = data_grid.grid();
    for y in 0..grid.size_y() {
        for corners in [
            [Corner::TopLeft, Corner::TopRight],
            [Corner::BottomLeft, Corner::BottomRight],
        ] {
            for x in 0..grid.size_x() {
                match data_grid.get_2d(x, y) {
                    None => print!("❓❓"),
                    Some(tile) => {
                        for corner in corners {
                            print!("{}", icon(tile.corner_type(corner)));
                        }
                    }
                }
            }
            println!();
        }
    }
    println!();
}
