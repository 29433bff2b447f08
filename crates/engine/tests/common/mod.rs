#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{
    Actor, AmountInput, CreateMovementCmd, CreateUserCmd, Engine, Movement, MovementKind, Role,
};
use migration::MigratorTrait;

pub struct Fixture {
    pub engine: Engine,
    pub db: DatabaseConnection,
    pub admin: Actor,
}

pub async fn engine_with_admin() -> Fixture {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    let admin = engine
        .bootstrap_admin(CreateUserCmd::new("admin@cash.test").display_name("Admin"))
        .await
        .unwrap();
    let admin = Actor::new(admin.id, admin.role);
    Fixture { engine, db, admin }
}

impl Fixture {
    pub async fn user(&self, email: &str, role: Role) -> Actor {
        let user = self
            .engine
            .create_user(&self.admin, CreateUserCmd::new(email).role(role))
            .await
            .unwrap();
        Actor::new(user.id, user.role)
    }

    pub async fn record(
        &self,
        actor: &Actor,
        concept: &str,
        amount: &str,
        occurred_at: &str,
        kind: MovementKind,
    ) -> Movement {
        self.engine
            .create_movement(
                actor,
                CreateMovementCmd::new(AmountInput::Text(amount.to_string()))
                    .concept(concept)
                    .occurred_at(occurred_at)
                    .kind(kind),
            )
            .await
            .unwrap()
    }
}
