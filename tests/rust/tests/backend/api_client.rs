//! GymApiClient integration tests with mock HTTP server

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gymbook_core::domain::{
    AppointmentId, AppointmentRequest, CompetitionId, CompetitionType, Enrollment, ExerciseRecord,
    ExerciseSample, MachineType, NewCompetition, UserId, WorkoutLog,
};
use gymbook_core::repository::{
    AppointmentRepository, CompetitionRepository, UserRepository, WorkoutRepository,
};
use gymbook_core::service::GymApiClient;
use gymbook_core::ClientConfig;
use tests::fixtures::{at, date, working_hours};

fn client_for(server: &MockServer) -> GymApiClient {
    let config = ClientConfig::new(&format!("{}/api", server.uri())).unwrap();
    GymApiClient::new(&config).unwrap().with_token("test-token")
}

// =============================================================================
// Appointments
// =============================================================================

#[tokio::test]
async fn list_availability_parses_and_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Appointments"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "date": "2024-07-02T00:00:00",
                "isFull": false,
                "workingHours": {"startHour": 8, "endHour": 20},
                "hourlyAvailability": [
                    {
                        "hour": 9,
                        "spotsLeft": 3,
                        "isFull": false,
                        "machineAvailabilities": [
                            {"machineId": 1, "machineName": "Bench Press", "slotCount": 2}
                        ]
                    }
                ]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let days = client_for(&server).list_availability().await.unwrap();

    assert_eq!(days.len(), 1);
    assert_eq!(days[0].date, date(2));
    assert_eq!(days[0].working_hours, Some(working_hours(8, 20)));
    let nine = days[0].hour(9).unwrap();
    assert_eq!(nine.spots_left, Some(3));
    assert_eq!(nine.find_by_name("Bench Press").map(|m| m.slot_count), Some(2));
}

#[tokio::test]
async fn invalid_availability_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2024-07-02", "hourlyAvailability": [{"hour": 24}]}
        ])))
        .mount(&server)
        .await;

    let err = client_for(&server).list_availability().await.unwrap_err();
    assert!(format!("{:#}", err).contains("hour 24"));
}

#[tokio::test]
async fn reversed_working_hours_fail_to_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2024-07-02", "workingHours": {"startHour": 20, "endHour": 8}}
        ])))
        .mount(&server)
        .await;

    assert!(client_for(&server).list_availability().await.is_err());
}

#[tokio::test]
async fn user_appointments_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Appointments/user/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "date": "2024-07-02T09:00:00Z"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Appointments/appointments-with-machines-for-user/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "date": "2024-07-02T09:00:00", "machines": [{"machineName": "TreadMill"}]}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let plain = client.list_for_user(UserId(7)).await.unwrap();
    assert_eq!(plain[0].starts_at(), at(2, 9, 0));

    let with_machines = client.list_with_machines_for_user(UserId(7)).await.unwrap();
    assert!(with_machines[0].has_machine("TreadMill"));
}

#[tokio::test]
async fn users_with_appointments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Appointments/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 3,
                "userName": "ana",
                "appointments": [{"id": 8, "date": "2024-07-02T10:00:00"}]
            }
        ])))
        .mount(&server)
        .await;

    let users = client_for(&server).list_users_with_appointments().await.unwrap();
    assert_eq!(users[0].user_name.as_deref(), Some("ana"));
    assert!(users[0].has_appointment_on(date(2)));
}

#[tokio::test]
async fn book_sends_pascal_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Appointments/book"))
        .and(body_json(json!({"UserId": 7, "Date": "2024-07-02T09:00:00Z"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = AppointmentRequest::hour(UserId(7), date(2), 9);
    client_for(&server).book(&request).await.unwrap();
}

#[tokio::test]
async fn backend_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Appointments/book"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Hour is full"))
        .mount(&server)
        .await;

    let request = AppointmentRequest::hour(UserId(7), date(2), 9);
    let err = client_for(&server).book(&request).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("400"), "{}", message);
    assert!(message.contains("Hour is full"), "{}", message);
}

#[tokio::test]
async fn cancel_uses_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/Appointments/12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).cancel(AppointmentId(12)).await.unwrap();
}

#[tokio::test]
async fn check_appointment_reads_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Appointments/checkAppointment"))
        .and(body_json(json!({"UserId": 7, "Date": "2024-07-02T09:00:00"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Appointments/checkAppointment"))
        .and(body_json(json!({"UserId": 8, "Date": "2024-07-02T09:00:00"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.has_appointment_at(UserId(7), at(2, 9, 0)).await.unwrap());
    assert!(!client.has_appointment_at(UserId(8), at(2, 9, 0)).await.unwrap());
}

#[tokio::test]
async fn set_working_hours_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Appointments/SetWorkingHours"))
        .and(body_json(json!({"StartHour": 7, "EndHour": 21})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .set_working_hours(&working_hours(7, 21))
        .await
        .unwrap();
}

// =============================================================================
// Competitions
// =============================================================================

fn competition_json() -> serde_json::Value {
    json!({
        "id": 4,
        "name": "June",
        "competitionType": "Strength",
        "description": "Volume",
        "startDate": "2024-06-01T00:00:00Z",
        "endDate": "2024-06-30T00:00:00Z",
        "machines": ["Bench Press"],
        "code": "JUNE",
        "users": [{"userId": 7, "username": "ana", "points": 12}]
    })
}

#[tokio::test]
async fn create_competition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/competitions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(competition_json()))
        .expect(1)
        .mount(&server)
        .await;

    let new_competition = NewCompetition {
        name: "June".to_string(),
        competition_type: CompetitionType::Strength,
        description: "Volume".to_string(),
        start_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap(),
        machines: vec!["Bench Press".to_string()],
    };
    let created = client_for(&server).create(&new_competition).await.unwrap();
    assert_eq!(created.id, CompetitionId(4));
    assert_eq!(created.code.as_deref(), Some("JUNE"));
}

#[tokio::test]
async fn competition_with_users_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Competitions/competition-with-users/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(competition_json()))
        .expect(1)
        .mount(&server)
        .await;

    let competition = client_for(&server)
        .get_with_users(CompetitionId(4))
        .await
        .unwrap();
    assert_eq!(competition.name, "June");
    assert_eq!(competition.leaderboard()[0].username, "ana");
}

#[tokio::test]
async fn competition_dates_without_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Competitions/competitions-with-users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5,
            "name": "July",
            "competitionType": "Mixed",
            "startDate": "2024-07-01T00:00:00",
            "endDate": "2024-07-31T00:00:00",
            "users": []
        }])))
        .mount(&server)
        .await;

    let competitions = client_for(&server).list_with_users().await.unwrap();
    assert_eq!(
        competitions[0].start_date,
        Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn competition_for_user_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Competitions/competition-for-user/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(competition_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Competitions/competition-for-user/8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Competitions/competition-for-user/9"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let enrolled = client.get_for_user(UserId(7)).await.unwrap().unwrap();
    assert_eq!(enrolled.position_of(UserId(7)), Some(1));
    assert!(client.get_for_user(UserId(8)).await.unwrap().is_none());
    assert!(client.get_for_user(UserId(9)).await.is_err());
}

#[tokio::test]
async fn membership_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Competitions/competitions-with-users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([competition_json()])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Competitions/enroll"))
        .and(body_json(json!({"UserId": 7, "CompetitionCode": "JUNE"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Competitions/unenroll/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Competitions/remove-user/4/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.list_with_users().await.unwrap().len(), 1);
    client
        .enroll(&Enrollment {
            user_id: UserId(7),
            competition_code: "JUNE".to_string(),
        })
        .await
        .unwrap();
    client.unenroll(UserId(7)).await.unwrap();
    client.remove_user(CompetitionId(4), UserId(7)).await.unwrap();
}

// =============================================================================
// Workouts
// =============================================================================

#[tokio::test]
async fn generate_exercise_data_picks_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Workouts/GenerateStrengthExerciseData"))
        .and(body_json(json!({"exerciseName": "Bench Press", "duration": 300})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "Strength",
            "exercise": "Bench Press",
            "repsPerSet": [12, 10],
            "weightPerSet": [40.0, 45.0]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Workouts/GenerateCardioExerciseData"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "Cardio",
            "exercise": "TreadMill",
            "distance": 1.2,
            "avg_speed": 9.5,
            "max_speed": 11.0,
            "calories": 90.0,
            "time": 480.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let strength = client
        .generate_exercise_data(&ExerciseSample {
            exercise_name: "Bench Press".to_string(),
            duration: 300,
            machine_type: MachineType::Strength,
        })
        .await
        .unwrap();
    assert_eq!(strength.details().len(), 2);

    let cardio = client
        .generate_exercise_data(&ExerciseSample {
            exercise_name: "TreadMill".to_string(),
            duration: 480,
            machine_type: MachineType::Cardio,
        })
        .await
        .unwrap();
    assert!(matches!(cardio, ExerciseRecord::Cardio { calories, .. } if calories == 90.0));
}

#[tokio::test]
async fn log_workout_posts_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Workouts"))
        .and(body_json(json!({
            "userId": 7,
            "durationInSeconds": 900,
            "details": [{
                "name": "Bench Press",
                "reps": 10,
                "weight": 50.0,
                "distance": 0.0,
                "avgSpeed": 0.0,
                "maxSpeed": 0.0,
                "caloriesBurned": 0.0,
                "time": 0.0
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let records = vec![ExerciseRecord::Strength {
        exercise: "Bench Press".to_string(),
        reps_per_set: vec![10],
        weight_per_set: vec![50.0],
    }];
    let log = WorkoutLog::new(UserId(7), 900, &records);
    client_for(&server).log_workout(&log).await.unwrap();
}

#[tokio::test]
async fn workout_history_groups_by_exercise() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Workouts/user-workout-history/7"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "date": "2024-07-02T10:00:00",
            "durationInSeconds": 1500,
            "points": 18,
            "details": [
                {"name": "Leg Press", "reps": 12, "weight": 80.0, "distance": null,
                 "avgSpeed": null, "maxSpeed": null, "caloriesBurned": null, "time": null},
                {"name": "StepMachine", "reps": null, "weight": null, "distance": 0.8,
                 "avgSpeed": 5.0, "maxSpeed": 6.5, "caloriesBurned": 70.0, "time": 540.0},
                {"name": "Leg Press", "reps": 10, "weight": 85.0, "distance": null,
                 "avgSpeed": null, "maxSpeed": null, "caloriesBurned": null, "time": null}
            ]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let history = client_for(&server).list_history(UserId(7)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, at(2, 10, 0));
    assert_eq!(history[0].points, 18);

    let groups: Vec<_> = history[0]
        .exercises()
        .into_iter()
        .map(|g| (g.name, g.details.len()))
        .collect();
    assert_eq!(
        groups,
        vec![("Leg Press".to_string(), 2), ("StepMachine".to_string(), 1)]
    );
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn user_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Users/profile/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "ana",
            "firstName": "Ana",
            "lastName": "Lind",
            "age": 31,
            "height": null,
            "weight": 62.5
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Users/profile/8"))
        .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let profile = client.get_profile(UserId(7)).await.unwrap();
    assert_eq!(profile.full_name(), "Ana Lind");
    assert_eq!(profile.height, None);
    assert_eq!(profile.weight, Some(62.5));

    let err = client.get_profile(UserId(8)).await.unwrap_err();
    assert!(err.to_string().contains("User not found"));
}
