//! Restaurant staff accounts.

use kitchen_models::{NewTeamMember, TeamMember, TeamMemberUpdate};

use crate::client::{with_query, KitchenClient};
use crate::error::SdkError;
use crate::request::RequestOptions;

const USERS_PATH: &str = "/api/auth/users/";

fn member_path(id: i64) -> String {
    format!("{USERS_PATH}{id}/")
}

impl KitchenClient {
    /// Members of the active restaurant, newest first.
    pub async fn list_team_members(&self) -> Result<Vec<TeamMember>, SdkError> {
        let path = with_query(USERS_PATH, [("ordering", Some("-id".to_string()))]);
        self.get_list(&path).await
    }

    /// Add a member to the active restaurant.
    pub async fn create_team_member(&self, member: &NewTeamMember) -> Result<TeamMember, SdkError> {
        self.send(RequestOptions::post(), USERS_PATH, member).await
    }

    /// Change a member's name, role or activation.
    pub async fn update_team_member(
        &self,
        id: i64,
        update: &TeamMemberUpdate,
    ) -> Result<TeamMember, SdkError> {
        self.send(RequestOptions::patch(), &member_path(id), update)
            .await
    }

    /// Remove a member.
    pub async fn delete_team_member(&self, id: i64) -> Result<(), SdkError> {
        self.delete_resource(&member_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_models::TeamRole;
    use mock_kitchen::MockKitchen;

    use crate::config::ClientConfig;
    use crate::store::Session;

    #[tokio::test]
    async fn new_member_is_listed_first() {
        let mock = MockKitchen::new();
        let (addr, _server) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let client = KitchenClient::new(
            ClientConfig::new(format!("http://{addr}")),
            Session::in_memory(),
        )
        .unwrap();
        client.session().set_tokens(&mock.issue_tokens()).unwrap();

        let member = NewTeamMember::new("sous", "sous@kitchen.test", "pw", TeamRole::Staff).unwrap();
        let created = client.create_team_member(&member).await.unwrap();
        assert_eq!(created.role, TeamRole::Staff);

        let members = client.list_team_members().await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].username, "sous");
    }
}
