//! Initial database migration.
//!
//! Creates the enums, tables, indexes, and `updated_at` triggers for branches,
//! users, activities, resources, schedules, performance, and labor.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: BRANCHES & USERS
        // ============================================================
        db.execute_unprepared(BRANCHES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: ACTIVITIES & RESOURCES
        // ============================================================
        db.execute_unprepared(ACTIVITIES_SQL).await?;
        db.execute_unprepared(RESOURCES_SQL).await?;
        db.execute_unprepared(ACTIVITY_RESOURCES_SQL).await?;

        // ============================================================
        // PART 4: SCHEDULES & PERFORMANCE
        // ============================================================
        db.execute_unprepared(SCHEDULES_SQL).await?;
        db.execute_unprepared(PERFORMANCE_SQL).await?;

        // ============================================================
        // PART 5: LABOR
        // ============================================================
        db.execute_unprepared(WORKERS_SQL).await?;
        db.execute_unprepared(ACTIVITY_WORKERS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('admin', 'staff');

CREATE TYPE activity_type AS ENUM ('revenue', 'expense', 'neutral');

CREATE TYPE resource_type AS ENUM ('inventory', 'human');

CREATE TYPE performance_status AS ENUM ('assigned', 'in_progress', 'completed');
";

const BRANCHES_SQL: &str = r"
CREATE TABLE branches (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    location VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL UNIQUE,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    branch_id UUID NOT NULL REFERENCES branches(id) ON DELETE RESTRICT,
    role user_role NOT NULL DEFAULT 'staff',
    image VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_branch ON users(branch_id);
";

const ACTIVITIES_SQL: &str = r"
CREATE TABLE activities (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    description VARCHAR(255) NOT NULL,
    activity_type activity_type NOT NULL,
    amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    activity_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_activity_amount_non_negative CHECK (amount >= 0)
);

CREATE INDEX idx_activities_date ON activities(activity_date DESC, created_at DESC);
CREATE INDEX idx_activities_type ON activities(activity_type);
";

const RESOURCES_SQL: &str = r"
CREATE TABLE resources (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0,
    unit VARCHAR(50),
    resource_type resource_type NOT NULL DEFAULT 'inventory',
    threshold INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_resource_quantity CHECK (quantity >= 0),
    CONSTRAINT chk_resource_threshold CHECK (threshold >= 0)
);
";

const ACTIVITY_RESOURCES_SQL: &str = r"
CREATE TABLE activity_resources (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    activity_id UUID NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    resource_id UUID NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
    allocated_quantity INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_activity_resource UNIQUE (activity_id, resource_id),
    CONSTRAINT chk_allocated_quantity CHECK (allocated_quantity >= 0)
);

CREATE INDEX idx_activity_resources_resource ON activity_resources(resource_id);
";

const SCHEDULES_SQL: &str = r"
CREATE TABLE schedules (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    activity_id UUID NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    scheduled_date DATE NOT NULL,
    notification_message TEXT,
    notification_sent BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_schedules_date ON schedules(scheduled_date);
CREATE INDEX idx_schedules_activity ON schedules(activity_id);
";

const PERFORMANCE_SQL: &str = r"
CREATE TABLE performance (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    activity_id UUID NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    status performance_status NOT NULL DEFAULT 'assigned',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_performance_user_activity UNIQUE (user_id, activity_id)
);

CREATE INDEX idx_performance_activity ON performance(activity_id);
";

const WORKERS_SQL: &str = r"
CREATE TABLE workers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    hourly_rate NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_worker_rate_positive CHECK (hourly_rate > 0)
);
";

const ACTIVITY_WORKERS_SQL: &str = r"
CREATE TABLE activity_workers (
    activity_id UUID NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    worker_id UUID NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
    work_hours INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    PRIMARY KEY (activity_id, worker_id),
    CONSTRAINT chk_work_hours_positive CHECK (work_hours > 0)
);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_branches_updated_at BEFORE UPDATE ON branches
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
CREATE TRIGGER trg_resources_updated_at BEFORE UPDATE ON resources
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
CREATE TRIGGER trg_performance_updated_at BEFORE UPDATE ON performance
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TABLE IF EXISTS activity_workers CASCADE;
DROP TABLE IF EXISTS workers CASCADE;
DROP TABLE IF EXISTS performance CASCADE;
DROP TABLE IF EXISTS schedules CASCADE;
DROP TABLE IF EXISTS activity_resources CASCADE;
DROP TABLE IF EXISTS resources CASCADE;
DROP TABLE IF EXISTS activities CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS branches CASCADE;

DROP FUNCTION IF EXISTS touch_updated_at();

DROP TYPE IF EXISTS performance_status;
DROP TYPE IF EXISTS resource_type;
DROP TYPE IF EXISTS activity_type;
DROP TYPE IF EXISTS user_role;
";
