use crate::storage::LocalStore;
use clap::Args;
use fusion_core as game;
use game::{Direction, GameStatus};
use yew::prelude::*;

fn random_seed() -> u64 {
    (0..8).fold(0, |seed, _| (seed << 8) | (256. * js_sys::Math::random()) as u64)
}

/// Text shown on a tile, the element symbol when the rank has one.
fn tile_label(tile: &game::Tile) -> String {
    tile.element()
        .map_or_else(|| tile.magnitude().to_string(), |element| element.symbol().to_string())
}

fn status_class(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Uninitialized | GameStatus::Playing => "in-progress",
        GameStatus::Won => "win",
        GameStatus::GameOver => "lose",
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Move(Direction),
    NewGame,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    cell: Option<game::Tile>,
    #[prop_or_default]
    spawned: bool,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let Some(tile) = props.cell else {
        return html! { <td class="cell"/> };
    };

    let mut class = classes!("cell", "tile", format!("rank-{}", tile.value));
    if tile.merged_this_turn {
        class.push("merged");
    }
    if props.spawned {
        class.push("new");
    }
    let title = tile.element().map(|element| element.name());

    html! {
        <td {class} {title}>
            <span>{tile_label(&tile)}</span>
            <sup>{tile.value.to_string()}</sup>
        </td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    #[prop_or_default]
    seed: Option<u64>,

    /// Width and height of the board
    #[arg(long)]
    #[prop_or_default]
    size: Option<game::Coord>,

    /// Rank that wins the game
    #[arg(long)]
    #[prop_or_default]
    win: Option<game::Rank>,
}

impl GameProps {
    fn config(&self) -> game::GridConfig {
        let classic = game::GridConfig::classic();
        game::GridConfig::new(
            self.size.unwrap_or(classic.size),
            self.win.unwrap_or(classic.win_value),
        )
    }
}

#[derive(Debug)]
pub(crate) struct GameView {
    engine: game::GridEngine<LocalStore>,
    spawned: Option<game::Coord2>,
}

impl GameView {
    fn apply_move(&mut self, direction: Direction) -> bool {
        if !self.engine.move_tiles(direction) {
            log::debug!("move {} changed nothing", direction);
            return false;
        }

        match self.engine.add_tile() {
            Ok(tile) => self.spawned = Some(tile.coords()),
            Err(err) => log::error!("Could not add tile after move {}: {}", direction, err),
        }
        self.engine.save_grid();
        true
    }

    fn new_game(&mut self) -> bool {
        let tiles = self.engine.reset_grid();
        log::debug!("new game: {:?}", tiles);
        self.spawned = None;
        self.engine.save_grid();
        true
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(random_seed);
        let (mut engine, tiles) = game::GridEngine::create(props.config(), LocalStore, seed);
        if !tiles.is_empty() {
            engine.save_grid();
        }

        Self {
            engine,
            spawned: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Move(direction) => self.apply_move(direction),
            NewGame => self.new_game(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let status = status_class(self.engine.status());
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });

        html! {
            <div class="fusion">
                <nav>
                    <aside title="Score">{self.engine.score().to_string()}</aside>
                    <span><button class={status} onclick={cb_new_game}/></span>
                    <aside title="Best">{self.engine.high_score().to_string()}</aside>
                </nav>
                <table>
                    {
                        for self.engine.rows().into_iter().map(|row| html! {
                            <tr>
                                {
                                    for row.into_iter().map(|cell| {
                                        let spawned = matches!(
                                            (cell, self.spawned),
                                            (Some(tile), Some(coords)) if tile.coords() == coords
                                        );
                                        html! { <CellView {cell} {spawned}/> }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <footer>
                    {
                        for Direction::ALL.into_iter().map(|direction| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Move(direction));
                            let disabled = !self.engine.can_move(direction);
                            html! { <button {onclick} {disabled}>{direction.name()}</button> }
                        })
                    }
                </footer>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_label_uses_element_symbol_then_magnitude() {
        assert_eq!(tile_label(&game::Tile::new(1, (0, 0))), "H");
        assert_eq!(tile_label(&game::Tile::new(10, (0, 0))), "Ne");
        assert_eq!(tile_label(&game::Tile::new(11, (0, 0))), "2048");
    }

    #[test]
    fn status_class_maps_finished_games() {
        assert_eq!(status_class(GameStatus::Playing), "in-progress");
        assert_eq!(status_class(GameStatus::Won), "win");
        assert_eq!(status_class(GameStatus::GameOver), "lose");
    }

    #[test]
    fn props_fall_back_to_classic_config() {
        let props = GameProps {
            seed: None,
            size: None,
            win: None,
        };
        assert_eq!(props.config(), game::GridConfig::classic());

        let props = GameProps {
            seed: Some(1),
            size: Some(40),
            win: Some(12),
        };
        assert_eq!(props.config(), game::GridConfig::new(16, 12));
    }
}
