/// Tables backing users, lookup options, incidents and incident relations.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL,
    team TEXT NOT NULL,
    avatar_url TEXT
);

CREATE TABLE IF NOT EXISTS types (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);
CREATE TABLE IF NOT EXISTS statuses (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);
CREATE TABLE IF NOT EXISTS severities (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);
CREATE TABLE IF NOT EXISTS products (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);
CREATE TABLE IF NOT EXISTS areas (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);
CREATE TABLE IF NOT EXISTS performance_indicators (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);
CREATE TABLE IF NOT EXISTS faulty_systems (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);
CREATE TABLE IF NOT EXISTS causes (id SERIAL PRIMARY KEY, name TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT true);

CREATE TABLE IF NOT EXISTS incidents (
    id SERIAL PRIMARY KEY,
    reference INTEGER,
    title TEXT NOT NULL,
    type INTEGER NOT NULL REFERENCES types(id),
    severity TEXT NOT NULL,
    summary TEXT NOT NULL,
    status TEXT NOT NULL,
    category TEXT,
    reporter INTEGER NOT NULL REFERENCES users(id),
    lead INTEGER REFERENCES users(id),
    qe INTEGER REFERENCES users(id),
    impact TEXT,
    treatment TEXT,
    mitigator TEXT,
    post_mortem TEXT,
    incident_source TEXT,
    slack_channel TEXT,
    slack_thread TEXT,
    related_incident INTEGER REFERENCES incidents(id),
    post_to_status_page BOOLEAN,
    impact_started_at TIMESTAMPTZ,
    impact_stopped_at TIMESTAMPTZ,
    reported_at TIMESTAMPTZ NOT NULL,
    identified_at TIMESTAMPTZ,
    fixed_at TIMESTAMPTZ,
    documentation_at TIMESTAMPTZ,
    in_review_at TIMESTAMPTZ,
    resolved_at TIMESTAMPTZ,
    closed_at TIMESTAMPTZ
);
ALTER TABLE incidents ADD COLUMN IF NOT EXISTS documentation_at TIMESTAMPTZ;
ALTER TABLE incidents ADD COLUMN IF NOT EXISTS in_review_at TIMESTAMPTZ;

CREATE TABLE IF NOT EXISTS incident_products (
    incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
    product_id INTEGER NOT NULL REFERENCES products(id),
    PRIMARY KEY (incident_id, product_id)
);
CREATE TABLE IF NOT EXISTS incident_areas (
    incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
    area_id INTEGER NOT NULL REFERENCES areas(id),
    PRIMARY KEY (incident_id, area_id)
);
CREATE TABLE IF NOT EXISTS incident_causes (
    incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
    cause_id INTEGER NOT NULL REFERENCES causes(id),
    PRIMARY KEY (incident_id, cause_id)
);
CREATE TABLE IF NOT EXISTS incident_faulty_systems (
    incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
    faulty_system_id INTEGER NOT NULL REFERENCES faulty_systems(id),
    PRIMARY KEY (incident_id, faulty_system_id)
);
CREATE TABLE IF NOT EXISTS incident_performance_indicators (
    incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
    performance_indicator_id INTEGER NOT NULL REFERENCES performance_indicators(id),
    PRIMARY KEY (incident_id, performance_indicator_id)
);

CREATE INDEX IF NOT EXISTS incidents_status_idx ON incidents (status);
CREATE INDEX IF NOT EXISTS incidents_severity_idx ON incidents (severity);
CREATE INDEX IF NOT EXISTS incidents_category_idx ON incidents (category);
"#;
