//! Per-entity draw command generation

use glam::Vec2;

use super::Canvas;
use super::commands::{DrawCommand, Sprite, colors};
use crate::sim::boss::Boss;
use crate::sim::entity::FrameContext;
use crate::sim::hazards::{ShockerBreaker, Star, StarBomb};
use crate::sim::player::{Player, Shot};
use crate::ui::{Button, HealthBar, Slider};

/// Submit the draw commands for one object
pub trait Draw {
    fn draw(&self, ctx: &FrameContext, canvas: &mut dyn Canvas);
}

/// Screen shake while hurt, alternating with the frame counter
fn hurt_shake(timer: u32) -> Vec2 {
    let d = if timer % 2 == 0 { 9.0 } else { -9.0 };
    Vec2::new(d, -d)
}

fn health_bar(canvas: &mut dyn Canvas, icon: Sprite, origin: Vec2, width: f32, height: f32, fraction: f32) {
    let mut bar = HealthBar::new(width);
    bar.update(fraction);
    canvas.submit(DrawCommand::HealthBar {
        icon,
        origin,
        width: bar.width(),
        height,
        filled: bar.filled(),
    });
}

impl Draw for Player {
    fn draw(&self, ctx: &FrameContext, canvas: &mut dyn Canvas) {
        let frame = ((ctx.timer / 10) % 2) as u8;
        canvas.submit(DrawCommand::Sprite {
            sprite: Sprite::Player {
                frame,
                firing: self.is_firing(),
                hurt: self.is_hurt(),
            },
            rect: self.sprite_rect(),
            angle: 0.0,
        });

        let size = self.sprite_rect().size();
        let shake = if self.is_hurt() { hurt_shake(ctx.timer) } else { Vec2::ZERO };
        let bar_height = (size.y / 3.0).floor();
        health_bar(
            canvas,
            Sprite::HeartIcon,
            Vec2::splat(10.0) + shake,
            size.x,
            bar_height,
            self.health_fraction(),
        );
    }
}

impl Draw for Shot {
    fn draw(&self, _ctx: &FrameContext, canvas: &mut dyn Canvas) {
        let impact = self.is_hit().then_some(self.hit_timer());
        canvas.submit(DrawCommand::Sprite {
            sprite: Sprite::Shot { impact },
            rect: self.sprite_rect(),
            angle: 0.0,
        });
    }
}

impl Draw for Star {
    fn draw(&self, _ctx: &FrameContext, canvas: &mut dyn Canvas) {
        let (sprite, angle) = match self {
            Star::Falling(s) => (Sprite::FallingStar { hurt: s.is_hurt() }, s.angle()),
            Star::Shooting(s) => (Sprite::ShootingStar, s.angle()),
        };
        canvas.submit(DrawCommand::Sprite {
            sprite,
            rect: self.sprite_rect(),
            angle,
        });
    }
}

impl Draw for ShockerBreaker {
    fn draw(&self, ctx: &FrameContext, canvas: &mut dyn Canvas) {
        if self.is_telegraphing(ctx) {
            canvas.submit(DrawCommand::Outline {
                rect: self.column(),
                color: colors::BREAKER_WARNING,
            });
        } else {
            canvas.submit(DrawCommand::Sprite {
                sprite: Sprite::Breaker { striking: true },
                rect: self.column(),
                angle: 0.0,
            });
        }
    }
}

impl Draw for StarBomb {
    fn draw(&self, ctx: &FrameContext, canvas: &mut dyn Canvas) {
        if self.is_approaching(ctx) {
            canvas.submit(DrawCommand::Sprite {
                sprite: Sprite::Bomb,
                rect: self.sprite_rect(),
                angle: 0.0,
            });
        } else if self.is_detonating(ctx) {
            canvas.submit(DrawCommand::Circle {
                center: self.blast_center(),
                radius: self.blast_drawn(),
                color: colors::BLAST,
            });
        }
    }
}

impl Draw for Boss {
    fn draw(&self, ctx: &FrameContext, canvas: &mut dyn Canvas) {
        let rect = self.sprite_rect();
        canvas.submit(DrawCommand::Sprite {
            sprite: Sprite::Boss {
                phase: self.phase(),
                hurt: self.is_hurt(),
                winking: self.is_winking(),
            },
            rect,
            angle: 0.0,
        });
        let shake = if self.is_hurt() { hurt_shake(ctx.timer) } else { Vec2::ZERO };
        health_bar(
            canvas,
            Sprite::BossIcon,
            Vec2::new(10.0, 110.0) + shake,
            (rect.w / 2.0).floor(),
            80.0,
            self.health_fraction(),
        );
    }
}

impl Draw for Button {
    fn draw(&self, _ctx: &FrameContext, canvas: &mut dyn Canvas) {
        if self.is_visible() {
            canvas.submit(DrawCommand::Button {
                rect: self.rect(),
                label: self.label(),
                hovered: self.is_hovered(),
            });
        }
    }
}

impl Draw for Slider {
    fn draw(&self, _ctx: &FrameContext, canvas: &mut dyn Canvas) {
        canvas.submit(DrawCommand::Slider {
            rect: self.rect(),
            handle_x: self.handle_x(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::DrawList;
    use crate::sim::entity::{Entity, Target};

    fn ctx() -> FrameContext {
        FrameContext::new(DEFAULT_FPS, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT))
    }

    #[test]
    fn test_health_bar_tracks_damage() {
        let mut player = Player::new(ctx().bounds, DEFAULT_FPS);
        player.take_damage(125);
        let mut list = DrawList::new();
        player.draw(&ctx(), &mut list);
        let bar = list.commands().iter().find_map(|c| match c {
            DrawCommand::HealthBar { width, filled, .. } => Some((*width, *filled)),
            _ => None,
        });
        let (width, filled) = bar.unwrap();
        assert!((filled - width / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_dead_player_bar_is_empty() {
        let mut player = Player::new(ctx().bounds, DEFAULT_FPS);
        player.take_damage(400);
        let mut list = DrawList::new();
        player.draw(&ctx(), &mut list);
        assert!(list
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::HealthBar { filled, .. } if *filled == 0.0)));
    }

    #[test]
    fn test_breaker_telegraph_then_strike() {
        let c = ctx();
        let mut breaker = ShockerBreaker::at(1, 100.0, &c);
        let mut list = DrawList::new();
        breaker.draw(&c, &mut list);
        assert!(matches!(list.commands()[0], DrawCommand::Outline { .. }));

        for _ in 0..=c.fps {
            breaker.logic(&c, &mut Vec::new());
        }
        list.clear();
        breaker.draw(&c, &mut list);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::Sprite { sprite: Sprite::Breaker { striking: true }, .. }
        ));
    }
}
